/// Single axis used for board height, width and positions.
pub type Coord = u8;

/// Count type used for mine, flag and cell totals.
pub type CellCount = u16;

/// Board coordinates as `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Cells within this Chebyshev distance of the first reveal never hold a mine.
pub const SAFE_RADIUS: Coord = 2;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Largest of the row and column distances between two cells.
pub const fn chebyshev_distance(a: Coord2, b: Coord2) -> Coord {
    let rows = a.0.abs_diff(b.0);
    let cols = a.1.abs_diff(b.1);
    if rows > cols { rows } else { cols }
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Moves `coords` by `offset`, returning a value only while it stays inside `bounds`.
fn step(coords: Coord2, offset: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let row = coords.0.checked_add_signed(offset.0)?;
    let col = coords.1.checked_add_signed(offset.1)?;
    (row < bounds.0 && col < bounds.1).then_some((row, col))
}

/// Walks the in-bounds cells around a center, diagonals included, center excluded.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&offset) = OFFSETS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(next) = step(self.center, offset, self.bounds) {
                return Some(next);
            }
        }
        None
    }
}
