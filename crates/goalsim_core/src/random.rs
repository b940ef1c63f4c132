//! Deterministic random layer: stable seed derivation plus a small-state
//! uniform stream and the distribution samplers built on it.
//!
//! Reproducibility contract: the same `(instrument id, user key)` pair always
//! produces the same seed, and the same seed always produces the same
//! infinite stream of draws, independent of platform or call site.

use rand::{RngCore, SeedableRng};

/// djb2 string hash, reduced to 32 bits.
///
/// `h = h * 33 + byte` with wrapping arithmetic. Not cryptographic; chosen
/// for speed and a well-spread distribution over short ticker-style ids.
#[must_use]
pub fn djb2_hash(s: &str) -> u32 {
    let mut hash: u32 = 5381;
    for byte in s.bytes() {
        hash = (hash << 5).wrapping_add(hash).wrapping_add(u32::from(byte));
    }
    hash
}

/// Combine an instrument id and a user key into a single 32-bit seed.
///
/// The two ids are hashed separately and mixed with a shift/XOR so that
/// adjacent ids ("069500" vs "069501", user 7 vs user 8) land on distant
/// seeds instead of colliding.
#[must_use]
pub fn pair_seed(instrument_id: &str, user_key: &str) -> u32 {
    let instrument_hash = djb2_hash(instrument_id);
    let user_hash = djb2_hash(user_key);
    (instrument_hash << 1) ^ user_hash
}

/// Mulberry32 pseudo-random stream: a single 32-bit state advanced by fixed
/// additive/XOR-shift/multiply steps. Seeded runs replay the identical
/// stream. Not suitable for anything security-related.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// One Box–Muller transform: two uniform draws in, a pair of independent
    /// standard-normal variates out.
    pub fn normal_pair(&mut self) -> (f64, f64) {
        // ln(0) guard: a zero uniform would produce an infinite radius
        let u1 = self.next_f64().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64();

        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = std::f64::consts::TAU * u2;
        (radius * angle.cos(), radius * angle.sin())
    }

    /// Single standard-normal draw. Consumes a full Box–Muller pair and
    /// discards the sine variate, so the stream advances by exactly two
    /// uniforms per call.
    pub fn normal(&mut self) -> f64 {
        self.normal_pair().0
    }

    /// Student-t draw with `df` degrees of freedom: a standard normal divided
    /// by the root-mean of `df` squared normals. Produces the heavier tails
    /// seen in market returns.
    pub fn student_t(&mut self, df: u32) -> f64 {
        let z = self.normal();

        let mut chi2 = 0.0;
        for _ in 0..df {
            let n = self.normal();
            chi2 += n * n;
        }
        // degenerate chi-square only occurs if every draw was exactly zero
        let chi2 = chi2.max(1e-12);

        z / (chi2 / f64::from(df.max(1))).sqrt()
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        rand::rand_core::impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        rand::rand_core::impls::fill_bytes_via_next(self, dst)
    }
}
