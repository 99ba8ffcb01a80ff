use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Uniform placement that keeps the first revealed cell and its 5x5 surroundings free of mines.
///
/// When the requested mines do not fit outside that area the count is clamped to what fits.
#[derive(Clone, Debug)]
pub struct RandomMinePlacer<R = SmallRng> {
    rng: R,
}

impl RandomMinePlacer {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomMinePlacer<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

/// Every cell farther than [`SAFE_RADIUS`] from `start`, row by row.
pub fn eligible_cells(size: Coord2, start: Coord2) -> Vec<Coord2> {
    let (rows, cols) = size;
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .filter(|&coords| chebyshev_distance(coords, start) > SAFE_RADIUS)
        .collect()
}

impl<R: Rng> MinePlacer for RandomMinePlacer<R> {
    fn place(&mut self, config: GameConfig, start: Coord2) -> Vec<Coord2> {
        let mut allowed = eligible_cells(config.size(), start);

        let requested = usize::from(config.mines);
        let count = requested.min(allowed.len());
        if count < requested {
            log::warn!(
                "Only {} cells are eligible for mines, clamping requested {} to {}",
                allowed.len(),
                requested,
                count
            );
        }

        // partial Fisher-Yates: only the first `count` slots get shuffled
        for i in 0..count {
            let j = self.rng.random_range(i..allowed.len());
            allowed.swap(i, j);
        }
        allowed.truncate(count);
        allowed
    }
}
