use alloc::vec::Vec;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Chooses where mines go once the first cell to reveal is known.
///
/// This is the seam for swapping the random source out in tests and replays.
pub trait MinePlacer {
    fn place(&mut self, config: GameConfig, start: Coord2) -> Vec<Coord2>;
}

impl<P: MinePlacer + ?Sized> MinePlacer for &mut P {
    fn place(&mut self, config: GameConfig, start: Coord2) -> Vec<Coord2> {
        (**self).place(config, start)
    }
}
