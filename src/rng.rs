/// Multiplier of the xorshift64* generator.
const MULTIPLIER: u64 = 2685821657736338717;

/// Used in place of a zero seed, which would keep the stream at zero forever.
const FALLBACK_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// One xorshift-multiply step.
pub fn xorshift_mul(mut x: u64) -> u64 {
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    x.wrapping_mul(MULTIPLIER)
}

/// Small non-cryptographic stream owned by a single filter.
#[derive(Debug, Clone)]
pub struct XorShiftStream {
    state: u64,
}

impl XorShiftStream {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { FALLBACK_SEED } else { seed };
        XorShiftStream { state }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = xorshift_mul(self.state);
        self.state
    }

    pub fn next_bit(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    /// Uniform value in `0..4`.
    pub fn next_slot(&mut self) -> usize {
        (self.next_u64() & 3) as usize
    }
}
