use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// Rules engine for a single game.
///
/// Mines are placed lazily by `P` on the first reveal, so the opening move is always safe.
/// Moves stay accepted after the game is over; callers check [`PlayEngine::status`].
#[derive(Clone, Debug)]
pub struct PlayEngine<P = RandomMinePlacer> {
    config: GameConfig,
    board: Board,
    placer: P,
    revealed_count: CellCount,
    flagged_count: CellCount,
    mines_generated: bool,
    exploded: bool,
}

impl PlayEngine {
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RandomMinePlacer::new(seed))
    }
}

impl<P: MinePlacer> PlayEngine<P> {
    /// The config goes through [`GameConfig::new`], same as [`PlayEngine::init`].
    pub fn new(config: GameConfig, placer: P) -> Self {
        let config = GameConfig::new(config.rows, config.cols, config.mines);
        Self {
            config,
            board: Board::new(config.size()),
            placer,
            revealed_count: 0,
            flagged_count: 0,
            mines_generated: false,
            exploded: false,
        }
    }

    /// Starts over on a fresh, mine free board of the given shape.
    pub fn init(&mut self, rows: Coord, cols: Coord, mines: CellCount) {
        self.config = GameConfig::new(rows, cols, mines);
        self.board = Board::new(self.config.size());
        self.revealed_count = 0;
        self.flagged_count = 0;
        self.mines_generated = false;
        self.exploded = false;
        log::debug!("New game: {:?}", self.config);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn valid_coords(&self, coords: Coord2) -> bool {
        self.board.valid_coords(coords)
    }

    pub fn mines_generated(&self) -> bool {
        self.mines_generated
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    /// Requested mines until the first reveal, mines actually placed afterwards.
    pub fn mine_count(&self) -> CellCount {
        if self.mines_generated {
            self.board.mine_count()
        } else {
            self.config.mines
        }
    }

    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_count()) - i32::from(self.flagged_count)
    }

    fn is_won(&self) -> bool {
        self.mines_generated && !self.exploded && self.revealed_count == self.board.safe_cell_count()
    }

    pub fn is_done(&self) -> bool {
        self.exploded || self.is_won()
    }

    pub fn phase(&self) -> GamePhase {
        if self.exploded {
            GamePhase::Lost
        } else if self.is_won() {
            GamePhase::Won
        } else if self.mines_generated {
            GamePhase::InProgress
        } else {
            GamePhase::NotStarted
        }
    }

    /// `done` stays false until the first reveal has placed the mines, even on a full board.
    pub fn status(&self) -> GameStatus {
        let (rows, cols) = self.size();
        GameStatus {
            done: self.is_done(),
            exploded: self.exploded,
            rows,
            cols,
            flagged_count: self.flagged_count,
            revealed_count: self.revealed_count,
            mine_count: self.mine_count(),
        }
    }

    pub fn cell_view(&self, coords: Coord2) -> Option<CellView> {
        self.valid_coords(coords)
            .then(|| CellView::project(&self.board[coords], self.exploded))
    }

    pub fn rendering_grid(&self) -> Array2<CellView> {
        self.board.view(self.exploded)
    }

    /// One string per row, one symbol per cell: `H`, `F`, `M` or the adjacent mine count.
    pub fn rendering(&self) -> Vec<String> {
        self.rendering_grid()
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|view| view.symbol()).collect())
            .collect()
    }

    /// Reveals a cell, returning whether the move was accepted.
    pub fn reveal(&mut self, coords: Coord2) -> bool {
        match self.try_reveal(coords) {
            Ok(outcome) => {
                log::debug!("Reveal at {:?}: {:?}", coords, outcome);
                if outcome.ends_game() {
                    log::info!("Game over after reveal at {:?}: {:?}", coords, outcome);
                }
                true
            }
            Err(err) => {
                log::debug!("Reveal at {:?} refused: {}", coords, err);
                false
            }
        }
    }

    /// Flags or unflags a cell, returning whether the move was accepted.
    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        match self.try_toggle_flag(coords) {
            Ok(outcome) => {
                log::debug!("Flag at {:?}: {:?}", coords, outcome);
                true
            }
            Err(err) => {
                log::debug!("Flag at {:?} refused: {}", coords, err);
                false
            }
        }
    }

    pub fn try_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if !self.mines_generated {
            self.generate_mines(coords);
        }

        match self.board[coords].visibility {
            Visibility::Hidden => {}
            Visibility::Revealed => return Err(GameError::AlreadyRevealed),
            Visibility::Flagged => return Err(GameError::Flagged),
        }

        if self.board[coords].is_mine {
            self.open_cell(coords);
            self.exploded = true;
            log::debug!("Mine hit at {:?}", coords);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_reveal(coords);

        if self.is_won() {
            log::debug!("All {} safe cells revealed", self.revealed_count);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn try_toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;
        let cell = &mut self.board[coords];

        match cell.visibility {
            Visibility::Hidden => {
                cell.visibility = Visibility::Flagged;
                self.flagged_count += 1;
                Ok(MarkOutcome::Flagged)
            }
            Visibility::Flagged => {
                cell.visibility = Visibility::Hidden;
                self.flagged_count -= 1;
                Ok(MarkOutcome::Unflagged)
            }
            Visibility::Revealed => Err(GameError::AlreadyRevealed),
        }
    }

    /// Places mines around the first reveal and drops any flags set before it.
    fn generate_mines(&mut self, start: Coord2) {
        let mines = self.placer.place(self.config, start);
        let placed = self.board.lay_mines(&mines);

        let cleared = self.board.clear_flags();
        if cleared > 0 {
            log::debug!("Cleared {} flags placed before the first reveal", cleared);
        }
        self.flagged_count = 0;

        self.board.recompute_counts();
        self.mines_generated = true;

        log::debug!(
            "Placed {} mines (requested {}) with first reveal at {:?}",
            placed,
            self.config.mines,
            start
        );
        log::debug!("Mines and counts after placement:\n{}", self.board);
    }

    /// Opens `start` and every cell reachable through zero-count cells.
    ///
    /// Cells are opened as soon as they are discovered, so each one is queued at most once.
    fn flood_reveal(&mut self, start: Coord2) {
        self.open_cell(start);
        let mut frontier = VecDeque::from([start]);

        while let Some(coords) = frontier.pop_front() {
            if self.board[coords].adjacent_mines != 0 {
                continue;
            }
            for pos in self.board.iter_neighbors(coords) {
                // flags are never opened by the fill
                if self.board[pos].is_hidden() {
                    self.open_cell(pos);
                    frontier.push_back(pos);
                }
            }
        }
    }

    fn open_cell(&mut self, coords: Coord2) {
        let cell = &mut self.board[coords];
        cell.visibility = Visibility::Revealed;
        self.revealed_count += 1;
        log::trace!("Opened {:?}, adjacent mines: {}", coords, cell.adjacent_mines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn fixed(rows: Coord, cols: Coord, mines: &[Coord2]) -> PlayEngine<FixedMinePlacer> {
        let config = GameConfig::new(rows, cols, mines.len() as CellCount);
        PlayEngine::new(config, FixedMinePlacer::new(mines))
    }

    fn mines_on<P>(engine: &PlayEngine<P>) -> usize {
        engine
            .board
            .iter_coords()
            .filter(|&pos| engine.board[pos].is_mine())
            .count()
    }

    #[test]
    fn first_reveal_is_always_safe() {
        for seed in 0..100u64 {
            let mut engine = PlayEngine::with_seed(GameConfig::new(16, 16, 40), seed);
            let start = ((seed % 16) as Coord, ((seed * 7) % 16) as Coord);

            assert!(engine.reveal(start));
            assert!(!engine.exploded());
            assert_eq!(mines_on(&engine), 40);
            assert_eq!(engine.status().mine_count, 40);
            for pos in engine.board.iter_coords() {
                if chebyshev_distance(pos, start) <= SAFE_RADIUS {
                    assert!(!engine.board[pos].is_mine(), "mine at {:?} with seed {}", pos, seed);
                }
            }
        }
    }

    #[test]
    fn no_mines_before_first_reveal() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(8, 10, 10), 1);
        engine.toggle_flag((0, 0));

        assert!(!engine.mines_generated());
        assert_eq!(mines_on(&engine), 0);
        assert_eq!(engine.phase(), GamePhase::NotStarted);
        assert_eq!(engine.status().mine_count, 10);
    }

    #[test]
    fn mines_are_generated_only_once() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(14, 18, 40), 9);
        engine.reveal((7, 9));
        let layout = engine.board.clone();

        for pos in layout.iter_coords() {
            engine.reveal(pos);
        }
        for pos in layout.iter_coords() {
            assert_eq!(engine.board[pos].is_mine(), layout[pos].is_mine());
        }
    }

    #[test]
    fn crowded_small_board_gets_no_mines() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(3, 3, 20), 5);
        assert_eq!(engine.config().mines, 9);

        assert!(engine.reveal((1, 1)));

        let status = engine.status();
        assert_eq!(status.mine_count, 0);
        assert_eq!(status.revealed_count, 9);
        assert!(status.done);
        assert!(!status.exploded);
        assert_eq!(engine.phase(), GamePhase::Won);
        assert_eq!(engine.rendering(), ["000", "000", "000"]);
    }

    #[test]
    fn revealed_counts_match_neighbors() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(14, 18, 40), 77);
        engine.reveal((0, 0));
        engine.reveal((13, 17));

        let grid = engine.rendering_grid();
        for pos in engine.board.iter_coords() {
            if let CellView::Count(count) = grid[pos.to_nd_index()] {
                let expected = engine
                    .board
                    .iter_neighbors(pos)
                    .filter(|&n| engine.board[n].is_mine())
                    .count();
                assert_eq!(usize::from(count), expected, "wrong count at {:?}", pos);
            }
        }
    }

    #[test]
    fn flood_fill_opens_zero_region_and_its_border() {
        let mut engine = fixed(3, 3, &[(2, 2)]);

        assert_eq!(engine.try_reveal((0, 0)), Ok(RevealOutcome::Won));
        assert_eq!(engine.rendering(), ["000", "011", "01H"]);
        assert_eq!(engine.status().revealed_count, 8);
    }

    #[test]
    fn flood_fill_stops_at_numbered_wall() {
        let mut engine = fixed(3, 5, &[(0, 2), (1, 2), (2, 2)]);

        assert_eq!(engine.try_reveal((1, 0)), Ok(RevealOutcome::Revealed));
        assert_eq!(engine.rendering(), ["02HHH", "03HHH", "02HHH"]);
        assert_eq!(engine.status().revealed_count, 6);
        assert_eq!(engine.phase(), GamePhase::InProgress);

        assert_eq!(engine.try_reveal((1, 4)), Ok(RevealOutcome::Won));
        assert_eq!(engine.rendering(), ["02H20", "03H30", "02H20"]);
        assert_eq!(engine.status().revealed_count, 12);
    }

    #[test]
    fn flood_fill_skips_flags() {
        let mut engine = fixed(1, 5, &[(0, 0)]);
        engine.reveal((0, 4));

        // (0, 0) is a mine, so (0, 1) is a border cell
        assert_eq!(engine.rendering(), ["H1000"]);

        let mut engine = fixed(1, 6, &[(0, 0)]);
        assert!(engine.reveal((0, 1)));
        assert!(engine.toggle_flag((0, 3)));
        assert!(engine.reveal((0, 5)));
        assert_eq!(engine.rendering(), ["H1HF00"]);
    }

    #[test]
    fn large_empty_board_floods_without_recursion() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(255, 255, 0), 0);

        assert_eq!(engine.try_reveal((128, 128)), Ok(RevealOutcome::Won));
        assert_eq!(engine.status().revealed_count, 65025);
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let mut engine = fixed(3, 3, &[(0, 0)]);
        engine.reveal((2, 2));
        assert!(engine.toggle_flag((0, 0)));

        assert!(!engine.reveal((0, 0)));
        assert_eq!(engine.try_reveal((0, 0)), Err(GameError::Flagged));
        assert_eq!(engine.cell_view((0, 0)), Some(CellView::Flagged));
        assert!(!engine.exploded());
    }

    #[test]
    fn flags_before_first_reveal_are_cleared() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(14, 18, 40), 3);
        assert!(engine.toggle_flag((0, 0)));
        assert!(engine.toggle_flag((13, 17)));
        assert_eq!(engine.status().flagged_count, 2);

        assert!(engine.reveal((7, 9)));

        assert_eq!(engine.status().flagged_count, 0);
        assert!(engine.rendering().iter().all(|row| !row.contains('F')));
    }

    #[test]
    fn first_reveal_on_a_flag_goes_through() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(8, 10, 10), 11);
        engine.toggle_flag((4, 4));

        assert!(engine.try_reveal((4, 4)).is_ok());
        assert_eq!(engine.cell_view((4, 4)), Some(CellView::Count(0)));
    }

    #[test]
    fn toggle_flag_round_trip_and_refusals() {
        let mut engine = fixed(2, 2, &[(0, 0)]);

        assert_eq!(engine.try_toggle_flag((1, 1)), Ok(MarkOutcome::Flagged));
        assert_eq!(engine.status().flagged_count, 1);
        assert_eq!(engine.try_toggle_flag((1, 1)), Ok(MarkOutcome::Unflagged));
        assert_eq!(engine.status().flagged_count, 0);

        engine.reveal((1, 1));
        assert_eq!(engine.try_toggle_flag((1, 1)), Err(GameError::AlreadyRevealed));
        assert!(!engine.toggle_flag((2, 0)));
        assert_eq!(engine.status().flagged_count, 0);
    }

    #[test]
    fn invalid_coordinates_are_ignored() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(8, 10, 10), 0);

        assert!(!engine.reveal((8, 0)));
        assert!(!engine.reveal((0, 10)));
        assert_eq!(engine.try_reveal((255, 255)), Err(GameError::InvalidCoords));
        assert!(!engine.mines_generated());
        assert_eq!(engine.cell_view((8, 0)), None);
    }

    #[test]
    fn repeated_reveal_is_refused() {
        let mut engine = fixed(2, 2, &[(0, 0)]);

        assert!(engine.reveal((1, 1)));
        assert!(!engine.reveal((1, 1)));
        assert_eq!(engine.try_reveal((1, 1)), Err(GameError::AlreadyRevealed));
        assert_eq!(engine.status().revealed_count, 1);
    }

    #[test]
    fn win_after_all_safe_cells() {
        let mut engine = fixed(2, 2, &[(0, 0)]);

        assert_eq!(engine.try_reveal((1, 1)), Ok(RevealOutcome::Revealed));
        assert_eq!(engine.try_reveal((0, 1)), Ok(RevealOutcome::Revealed));
        assert!(!engine.status().done);
        assert_eq!(engine.try_reveal((1, 0)), Ok(RevealOutcome::Won));

        let status = engine.status();
        assert!(status.done);
        assert!(!status.exploded);
        assert_eq!(status.revealed_count, 3);
        assert_eq!(status.phase(), GamePhase::Won);
        assert_eq!(engine.rendering(), ["H1", "11"]);
    }

    #[test]
    fn explosion_shows_every_mine() {
        let mut engine = fixed(3, 3, &[(0, 0), (2, 2)]);

        assert!(engine.reveal((0, 2)));
        assert_eq!(engine.rendering(), ["H10", "H21", "HHH"]);
        assert!(engine.toggle_flag((2, 2)));

        assert_eq!(engine.try_reveal((0, 0)), Ok(RevealOutcome::HitMine));
        assert_eq!(engine.rendering(), ["M10", "H21", "HHM"]);

        let status = engine.status();
        assert!(status.done);
        assert!(status.exploded);
        assert_eq!(status.revealed_count, 5);
        assert_eq!(status.flagged_count, 1);
        assert_eq!(engine.phase(), GamePhase::Lost);
    }

    #[test]
    fn moves_are_still_accepted_after_the_game_ends() {
        let mut engine = fixed(3, 3, &[(0, 0), (2, 2)]);
        engine.reveal((0, 2));
        engine.reveal((0, 0));

        assert!(engine.reveal((2, 0)));
        assert!(engine.toggle_flag((2, 2)));
        assert!(engine.status().done);
        assert!(engine.exploded());
    }

    #[test]
    fn queries_are_idempotent() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(8, 10, 10), 21);
        engine.reveal((3, 3));
        engine.toggle_flag((7, 9));

        assert_eq!(engine.status(), engine.status());
        assert_eq!(engine.rendering(), engine.rendering());
        assert_eq!(engine.rendering_grid(), engine.rendering_grid());
    }

    #[test]
    fn init_starts_a_fresh_game() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(8, 10, 10), 4);
        engine.reveal((0, 0));
        engine.toggle_flag((7, 9));

        engine.init(4, 4, 2);

        assert_eq!(engine.phase(), GamePhase::NotStarted);
        assert_eq!(engine.size(), (4, 4));
        assert_eq!(mines_on(&engine), 0);
        assert_eq!(
            engine.status(),
            GameStatus {
                done: false,
                exploded: false,
                rows: 4,
                cols: 4,
                flagged_count: 0,
                revealed_count: 0,
                mine_count: 2,
            }
        );
        assert_eq!(engine.rendering(), vec!["HHHH"; 4]);
    }

    #[test]
    fn new_clamps_config_like_init() {
        let engine = PlayEngine::with_seed(GameConfig { rows: 2, cols: 2, mines: 1000 }, 1);
        assert_eq!(engine.config(), GameConfig::new_unchecked(2, 2, 4));
        assert_eq!(engine.status().mine_count, 4);

        let engine = PlayEngine::with_seed(GameConfig::new_unchecked(0, 5, 0), 1);
        let status = engine.status();
        assert_eq!((status.rows, status.cols), (1, 5));
        assert_eq!(engine.rendering(), ["HHHHH"]);
        assert!(engine.config().total_cells() >= status.mine_count);
    }

    #[test]
    fn full_board_is_not_done_before_first_reveal() {
        let mut engine = PlayEngine::with_seed(GameConfig::new(1, 1, 1), 0);
        assert!(!engine.status().done);
        assert_eq!(engine.phase(), GamePhase::NotStarted);

        // the safe zone leaves no room for the mine
        assert_eq!(engine.try_reveal((0, 0)), Ok(RevealOutcome::Won));
        assert!(engine.status().done);
        assert_eq!(engine.status().mine_count, 0);
    }

    #[test]
    fn status_phase_follows_engine_phase() {
        let mut engine = fixed(3, 3, &[(0, 0), (2, 2)]);
        let moves: [(bool, Coord2); 5] = [
            (false, (1, 1)),
            (true, (0, 2)),
            (false, (1, 1)),
            (true, (2, 0)),
            (true, (0, 0)),
        ];

        assert_eq!(engine.status().phase(), engine.phase());
        for (reveal, coords) in moves {
            if reveal {
                engine.reveal(coords);
            } else {
                engine.toggle_flag(coords);
            }
            assert_eq!(engine.status().phase(), engine.phase(), "after {:?}", coords);
        }
        assert_eq!(engine.phase(), GamePhase::Lost);

        let mut engine = fixed(2, 2, &[(0, 0)]);
        for coords in [(1, 1), (0, 1), (1, 0)] {
            engine.reveal(coords);
            assert_eq!(engine.status().phase(), engine.phase());
        }
        assert_eq!(engine.phase(), GamePhase::Won);
    }

    #[test]
    fn mines_left_can_go_negative() {
        let mut engine = fixed(2, 2, &[(0, 0)]);
        engine.reveal((1, 1));
        engine.toggle_flag((0, 0));
        engine.toggle_flag((0, 1));

        assert_eq!(engine.mines_left(), -1);
        assert_eq!(engine.status().mines_left(), -1);
    }

    #[test]
    fn status_serializes_with_snake_case_fields() {
        let mut engine = fixed(2, 2, &[(0, 0)]);
        engine.reveal((0, 0));

        let json = serde_json::to_value(engine.status()).unwrap();
        assert_eq!(json["done"], true);
        assert_eq!(json["exploded"], true);
        assert_eq!(json["mine_count"], 1);
        assert_eq!(json["revealed_count"], 1);
    }
}
