//! Portable seeded randomness.
//!
//! Every client must build the same rocks from the same seed, so generation runs on a
//! xorshift generator whose output is fixed by this file rather than by whatever algorithm
//! `StdRng` happens to use in a given `rand` release.

use rand::{Error, RngCore, SeedableRng};

/// xorshift64* generator.
#[derive(Debug, Clone)]
pub struct XorShift {
    state: u64,
}

impl XorShift {
    pub fn new(seed: u64) -> Self {
        // splitmix64 scramble so small seeds still start far apart; state must be non-zero
        let mut z = seed.wrapping_add(0x9e3779b97f4a7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^= z >> 31;
        Self {
            state: if z == 0 { 0x2545f4914f6cdd1d } else { z },
        }
    }
}

impl RngCore for XorShift {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545f4914f6cdd1d)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Deterministic hash of a surface position. Same `(phi, theta)` bits always give the same value.
#[inline]
pub fn position_hash(phi: f32, theta: f32) -> u64 {
    let a = phi.to_bits() as u64;
    let b = theta.to_bits() as u64;
    let mut h = a
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(b.wrapping_mul(0x6c078965))
        .rotate_left(31);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h
}

/// Unit float in `[0, 1)` taken from one 16-bit lane of a hash.
#[inline]
pub fn hash_unit(hash: u64, lane: u32) -> f32 {
    let bits = (hash >> ((lane % 4) * 16)) & 0xffff;
    bits as f32 / 65536.0
}
