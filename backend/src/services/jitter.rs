//! Deterministic, seed-driven jitter.
//!
//! Randomness comes exclusively from hashing the seed string. Two uniforms are
//! cut from disjoint slices of the SHA-256 digest and fed through Box–Muller,
//! so the same seed yields the same perturbation in every process.

use std::f64::consts::PI;

use sha2::{Digest, Sha256};

/// Bits kept from each 64-bit digest word.
const UNIFORM_BITS: u32 = 52;
const UNIFORM_SCALE: f64 = (1u64 << UNIFORM_BITS) as f64;

fn digest(seed: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.finalize().into()
}

/// Map eight digest bytes to a uniform value in the open interval `(0, 1)`.
fn unit_open(bytes: &[u8]) -> f64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    // 52 bits keep `top + 0.5` exact, so the result never rounds to 0 or 1
    let top = u64::from_be_bytes(word) >> (64 - UNIFORM_BITS);
    (top as f64 + 0.5) / UNIFORM_SCALE
}

/// Two independent uniforms in `(0, 1)` derived from `seed`.
pub fn uniform_pair(seed: &str) -> (f64, f64) {
    let d = digest(seed);
    (unit_open(&d[0..8]), unit_open(&d[8..16]))
}

/// Standard-normal sample derived from `seed` (Box–Muller, cosine branch).
pub fn standard_normal(seed: &str) -> f64 {
    let (u1, u2) = uniform_pair(seed);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Jitter fraction `clamp(sigma * z, -clip, clip)` for `seed`.
pub fn deterministic_jitter(seed: &str, sigma: f64, clip: f64) -> f64 {
    if sigma == 0.0 {
        return 0.0;
    }
    let clip = clip.abs();
    (sigma * standard_normal(seed)).clamp(-clip, clip)
}

/// Short hex fingerprint of a seed, for debug output.
pub fn seed_fingerprint(seed: &str) -> String {
    hex::encode(&digest(seed)[..8])
}
