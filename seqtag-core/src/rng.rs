//! A small, seedable pseudo-random generator.
//!
//! Stochastic inference needs reproducible draws under test, so the generator
//! is a plain xorshift with an explicit seed rather than an OS-seeded source.
//! Not suitable for cryptographic use.

/// Xorshift64 pseudo-random generator.
///
/// Deterministic for a given seed. A zero seed is mapped to 1, since zero is
/// a fixed point of the xorshift transition.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Next value uniform in `[0, 1)`, with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
