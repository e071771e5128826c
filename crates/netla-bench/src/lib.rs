//! Shared helpers for netla benchmarks: seeded RNG, input generators.

use netla::DMat;

/// xoshiro256** generator, seeded through SplitMix64.
pub struct Rng([u64; 4]);

fn splitmix(z: &mut u64) -> u64 {
    *z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut x = *z;
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        let mut z = seed;
        Self(std::array::from_fn(|_| splitmix(&mut z)))
    }

    /// Uniform in [-1, 1].
    pub fn f64(&mut self) -> f64 {
        let s = &mut self.0;
        let out = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        out as f64 / u64::MAX as f64 * 2.0 - 1.0
    }

    fn fill(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.f64()).collect()
    }
}

pub fn make_rng() -> Rng {
    Rng::new(0xDEAD_BEEF_CAFE_BABE)
}

/// Dense square matrix with entries uniform in [-1, 1].
pub fn random_dmat(size: usize) -> DMat {
    DMat::from_raw(size, size, make_rng().fill(size * size))
}

/// `size`×`ncols` right-hand sides.
pub fn random_rhs(size: usize, ncols: usize) -> DMat {
    DMat::from_raw(size, ncols, Rng::new(0x5EED).fill(size * ncols))
}

/// Symmetric positive-definite matrix: A^T * A + 0.1 I
pub fn random_spd_dmat(size: usize) -> DMat {
    let a = random_dmat(size);
    let mut result = a.transpose().mul_mat(&a);
    for i in 0..size {
        result.set(i, i, result.get(i, i) + 0.1);
    }
    result
}
