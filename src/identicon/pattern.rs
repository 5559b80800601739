//! Seeded grid pattern. Each generation call owns its RNG instance, so
//! concurrent calls with different inputs cannot interfere with each other.
//!
//! The generator is ChaCha20, a portable stream whose output is stable across
//! platforms and releases of `rand_chacha`. The 16-byte identicon seed is
//! interpreted as a big-endian unsigned integer and the RNG is seeded with
//! that integer's 32-byte big-endian encoding. No equivalence with any other
//! implementation's generator is claimed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// An N x N boolean grid in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPattern {
    size: u32,
    cells: Vec<bool>,
}

impl GridPattern {
    /// Samples the grid from a seed: one uniform draw in [0, 1) per cell in
    /// row-major order, filled iff the draw lands below `fill_threshold`.
    pub fn from_seed(seed: &[u8; 16], size: u32, fill_threshold: f64) -> Self {
        let mut rng = ChaCha20Rng::from_seed(rng_seed(seed));
        let cells = (0..(size as usize * size as usize))
            .map(|_| rng.gen::<f64>() < fill_threshold)
            .collect();
        Self { size, cells }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_filled(&self, row: u32, col: u32) -> bool {
        self.cells[(row * self.size + col) as usize]
    }

    /// Iterates the coordinates of every filled cell, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(index, _)| (index as u32 / size, index as u32 % size))
    }
}

/// Big-endian encoding of the seed integer, widened to the RNG's 32-byte
/// seed: sixteen zero bytes followed by the identicon seed.
fn rng_seed(seed: &[u8; 16]) -> [u8; 32] {
    let mut expanded = [0u8; 32];
    expanded[16..].copy_from_slice(seed);
    expanded
}
