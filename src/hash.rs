use std::hash::Hasher;

use siphasher::sip::SipHasher24;

use crate::rng::xorshift_mul;

pub type Fingerprint = u8;

/// 128-bit SipHash key, split into its two 64-bit halves.
///
/// The default key is all zero: every filter built with it places a given
/// item in the same buckets with the same fingerprint. That keeps runs
/// reproducible but lets anyone who knows the key craft colliding items.
/// Pass random key material when the filter sees untrusted input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SipKey {
    pub k0: u64,
    pub k1: u64,
}

impl SipKey {
    pub fn new(k0: u64, k1: u64) -> Self {
        SipKey { k0, k1 }
    }

    pub fn random() -> Self {
        SipKey {
            k0: rand::random(),
            k1: rand::random(),
        }
    }

    pub fn digest(&self, item: &[u8]) -> u64 {
        let mut hasher = SipHasher24::new_with_keys(self.k0, self.k1);
        hasher.write(item);
        hasher.finish()
    }
}

/// Splits a digest into the primary bucket index and the fingerprint.
///
/// The index comes from the low 32 bits and the fingerprint from bits 32..40,
/// so the two never share input bits.
pub fn split_digest(digest: u64, mask: u32) -> (u32, Fingerprint) {
    let index = (digest as u32) & mask;
    let fingerprint = (digest >> 32) as Fingerprint;
    (index, fingerprint)
}

/// Mixes a fingerprint into a 32-bit value with two xorshift-multiply rounds.
pub fn scramble(fingerprint: Fingerprint) -> u32 {
    let x = xorshift_mul(xorshift_mul(fingerprint as u64));
    (x as u32) ^ ((x >> 32) as u32)
}

/// The other candidate bucket of `fingerprint` when it sits in `index`.
///
/// Applying this twice returns the original index.
pub fn alternate_index(index: u32, fingerprint: Fingerprint, mask: u32) -> u32 {
    (index ^ scramble(fingerprint)) & mask
}
