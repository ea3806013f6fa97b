// Game session: difficulty selection, ready/playing/won/lost phase and elapsed timer
// Owns the current board and the random source used to rebuild it on new game

use std::time::Duration;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tps_board::{Board, BoardConfig, OpenOutcome, TouchOutcome};
use crate::tps_error::Result;
use crate::tps_layout::Hit;
use crate::tps_tile::Pos;

/// The three difficulty presets; each level adds 20 mines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,   // 20 mines
    Medium, // 40 mines
    Hard,   // 60 mines
}

impl Serialize for Difficulty {
    /// Serialize difficulty as its name so the config file stays readable
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Difficulty, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(&s))
            .ok_or_else(|| serde::de::Error::custom(format!("unknown difficulty {:?}", s)))
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Level shown on the selector buttons (1-3)
    pub fn level(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Difficulty> {
        Difficulty::ALL.into_iter().find(|d| d.level() == level)
    }

    pub fn mine_count(&self) -> usize {
        self.level() as usize * 20
    }

    /// Stable identifier used in the config file
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Top-level state of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,   // Mines placed, nothing touched, timer at zero
    Playing, // Timer running
    Won,
    Lost,
}

impl Phase {
    pub fn is_ended(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Elapsed-time accumulator driven by frame deltas
#[derive(Debug, Clone, Default)]
pub struct Timer {
    elapsed: Duration,
    running: bool,
}

impl Timer {
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.running {
            self.elapsed += dt;
        }
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds with two decimals, padded to four characters
    pub fn text(&self) -> String {
        format!("{:4.2}", self.elapsed.as_secs_f64())
    }
}

pub struct Game {
    board: Board,
    phase: Phase,
    difficulty: Difficulty, // Selected; applied on the next new game
    timer: Timer,
    rng: StdRng,
}

impl Game {
    /// Start a session with an OS-seeded random source
    pub fn new(difficulty: Difficulty) -> Result<Self> {
        Game::with_rng(difficulty, StdRng::from_entropy())
    }

    /// Start a session with a reproducible mine layout sequence
    #[cfg(test)]
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Result<Self> {
        Game::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, mut rng: StdRng) -> Result<Self> {
        let board = Board::generate(BoardConfig::standard(difficulty)?, &mut rng)?;
        Ok(Game {
            board,
            phase: Phase::Ready,
            difficulty,
            timer: Timer::default(),
            rng,
        })
    }

    /// Start a session on a prepared board
    #[cfg(test)]
    pub fn from_board(board: Board, difficulty: Difficulty) -> Self {
        Game {
            board,
            phase: Phase::Ready,
            difficulty,
            timer: Timer::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Select a difficulty. The board in play keeps its mines until new game.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty != self.difficulty {
            info!("difficulty set to {}", difficulty.name());
        }
        self.difficulty = difficulty;
    }

    /// Discard the current round and re-arm the board
    pub fn new_game(&mut self) -> Result<()> {
        self.board.reset(self.difficulty, &mut self.rng)?;
        self.timer.reset();
        self.phase = Phase::Ready;
        info!(
            "new game: {} with {} mines",
            self.difficulty.name(),
            self.board.mine_count()
        );
        Ok(())
    }

    /// Touch a tile. Ignored once the round has ended.
    pub fn touch(&mut self, pos: Pos) -> Result<TouchOutcome> {
        if self.phase.is_ended() {
            return Ok(TouchOutcome::Ignored);
        }
        let outcome = self.board.touch(pos)?;
        if self.phase == Phase::Ready && outcome.is_effective() {
            self.phase = Phase::Playing;
            self.timer.start();
            info!("round started");
        }
        if let TouchOutcome::Opened(OpenOutcome::Detonated | OpenOutcome::Revealed(_)) = outcome {
            self.settle();
        }
        Ok(outcome)
    }

    /// Dispatch a hit-tested pointer-up
    pub fn pointer_up(&mut self, hit: Hit) -> Result<()> {
        match hit {
            Hit::Tile(pos) => {
                self.touch(pos)?;
            }
            Hit::Difficulty(d) => self.set_difficulty(d),
            Hit::NewGame => self.new_game()?,
            Hit::Nothing => {}
        }
        Ok(())
    }

    /// Per-frame step: prime timers, elapsed time and the end-of-round poll
    pub fn simulate(&mut self, dt: Duration) {
        self.board.tick(dt);
        self.timer.advance(dt);
        self.settle();
    }

    /// Check the board for a lost or won round
    fn settle(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        if self.board.poll_loss() {
            self.end(false);
        } else if self.board.poll_win() {
            self.end(true);
        }
    }

    fn end(&mut self, won: bool) {
        self.timer.stop();
        if won {
            self.phase = Phase::Won;
        } else {
            self.phase = Phase::Lost;
            self.board.reveal_all_mines();
        }
        info!(
            "round {} after {}s",
            if won { "won" } else { "lost" },
            self.timer.text().trim()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tps_board::{BOARD_H, BOARD_W};

    const FRAME: Duration = Duration::from_millis(100);

    fn wall_game() -> Game {
        let mines: Vec<Pos> = (0..BOARD_H).map(|y| (10, y)).collect();
        let board = Board::with_mines(BOARD_W, BOARD_H, &mines).unwrap();
        Game::from_board(board, Difficulty::Easy)
    }

    fn double_touch(game: &mut Game, pos: Pos) -> TouchOutcome {
        game.touch(pos).unwrap();
        game.touch(pos).unwrap()
    }

    #[test]
    fn test_difficulty_levels() {
        assert_eq!(Difficulty::Easy.mine_count(), 20);
        assert_eq!(Difficulty::Medium.mine_count(), 40);
        assert_eq!(Difficulty::Hard.mine_count(), 60);
        assert_eq!(Difficulty::from_level(2), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_level(4), None);
    }

    #[test]
    fn test_first_touch_starts_timer() {
        let mut game = Game::with_seed(Difficulty::Easy, 1).unwrap();
        game.simulate(FRAME);
        assert_eq!(game.phase(), Phase::Ready);
        assert_eq!(game.timer().elapsed(), Duration::ZERO);
        assert_eq!(game.timer().text(), "0.00");

        let safe = game.board().tiles().find(|t| !t.is_mine()).unwrap().pos();
        assert_eq!(game.touch(safe).unwrap(), TouchOutcome::Primed);
        assert_eq!(game.phase(), Phase::Playing);
        game.simulate(FRAME);
        game.simulate(FRAME);
        assert_eq!(game.timer().elapsed(), FRAME * 2);
        assert_eq!(game.timer().text(), "0.20");
    }

    #[test]
    fn test_second_touch_within_window_opens() {
        let mut game = wall_game();
        game.touch((15, 3)).unwrap();
        game.simulate(Duration::from_millis(500));
        let outcome = game.touch((15, 3)).unwrap();
        assert!(matches!(outcome, TouchOutcome::Opened(OpenOutcome::Revealed(_))));
        assert!(game.board().tile((15, 3)).unwrap().is_open());
    }

    #[test]
    fn test_single_touch_then_wait_flags() {
        let mut game = wall_game();
        game.touch((15, 3)).unwrap();
        for _ in 0..6 {
            game.simulate(FRAME);
        }
        let tile = game.board().tile((15, 3)).unwrap();
        assert!(!tile.is_open());
        assert_eq!(tile.mark(), crate::tps_tile::Mark::Flagged);
    }

    #[test]
    fn test_touching_mine_loses_and_reveals_all() {
        let mut game = wall_game();
        game.touch((0, 0)).unwrap();
        let outcome = game.touch((10, 7)).unwrap();
        assert_eq!(outcome, TouchOutcome::Primed);
        let outcome = game.touch((10, 7)).unwrap();
        assert_eq!(outcome, TouchOutcome::Opened(OpenOutcome::Detonated));

        assert_eq!(game.phase(), Phase::Lost);
        assert!(!game.timer().is_running());
        assert!(game.board().tiles().filter(|t| t.is_mine()).all(|t| t.is_open()));
        assert_eq!(
            game.board().tiles().filter(|t| !t.is_mine() && t.is_open()).count(),
            0
        );
        // the board stays frozen until a new game
        assert_eq!(game.touch((0, 0)).unwrap(), TouchOutcome::Ignored);
    }

    #[test]
    fn test_win_only_after_last_safe_tile() {
        let mut game = wall_game();
        let safe: Vec<Pos> = game
            .board()
            .tiles()
            .filter(|t| !t.is_mine())
            .map(|t| t.pos())
            .collect();
        assert_eq!(safe.len(), 380);

        for pos in safe {
            if game.board().tile(pos).unwrap().is_open() {
                continue;
            }
            double_touch(&mut game, pos);
            let opened = game.board().safe_opened();
            if opened < 380 {
                assert_eq!(game.phase(), Phase::Playing, "won early at {}", opened);
            }
        }
        assert_eq!(game.board().safe_opened(), 380);
        assert_eq!(game.phase(), Phase::Won);
        assert!(!game.timer().is_running());
        assert!(game.board().tiles().filter(|t| t.is_mine()).all(|t| !t.is_open()));
    }

    #[test]
    fn test_win_when_tiles_open_one_at_a_time() {
        // a mine every third row and column leaves no zero tiles, so nothing floods
        let mines: Vec<Pos> = (0..7)
            .flat_map(|i| (0..7).map(move |j| (1 + 3 * i, 1 + 3 * j)))
            .collect();
        let board = Board::with_mines(BOARD_W, BOARD_H, &mines).unwrap();
        let mut game = Game::from_board(board, Difficulty::Easy);
        let safe: Vec<Pos> = game
            .board()
            .tiles()
            .filter(|t| !t.is_mine())
            .map(|t| t.pos())
            .collect();
        assert_eq!(safe.len(), 351);

        for (n, &pos) in safe.iter().enumerate() {
            let outcome = double_touch(&mut game, pos);
            assert_eq!(outcome, TouchOutcome::Opened(OpenOutcome::Revealed(1)));
            assert_eq!(game.board().safe_opened(), n + 1);
            if n + 1 < safe.len() {
                assert_eq!(game.phase(), Phase::Playing, "won early at {}", n + 1);
            }
        }
        assert_eq!(game.phase(), Phase::Won);
        assert!(game.board().tiles().filter(|t| t.is_mine()).all(|t| !t.is_open()));
    }

    #[test]
    fn test_flood_region_from_zero_tile() {
        let mut game = wall_game();
        double_touch(&mut game, (4, 12));
        let open: Vec<Pos> = game
            .board()
            .tiles()
            .filter(|t| t.is_open())
            .map(|t| t.pos())
            .collect();
        let expected: Vec<Pos> = (0..BOARD_H)
            .flat_map(|y| (0..=9).map(move |x| (x, y)))
            .collect();
        assert_eq!(open, expected);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_difficulty_change_waits_for_new_game() {
        let mut game = Game::with_seed(Difficulty::Easy, 42).unwrap();
        game.set_difficulty(Difficulty::Hard);
        assert_eq!(game.board().mine_count(), 20);

        game.new_game().unwrap();
        assert_eq!(game.board().mine_count(), 60);
        assert_eq!(game.board().tiles().filter(|t| t.is_mine()).count(), 60);
        assert_eq!(game.phase(), Phase::Ready);
    }

    #[test]
    fn test_new_game_resets_round() {
        let mut game = wall_game();
        game.touch((0, 0)).unwrap();
        game.simulate(FRAME);
        double_touch(&mut game, (10, 0));
        assert_eq!(game.phase(), Phase::Lost);

        game.new_game().unwrap();
        assert_eq!(game.phase(), Phase::Ready);
        assert_eq!(game.timer().elapsed(), Duration::ZERO);
        assert_eq!(game.board().safe_opened(), 0);
        assert_eq!(game.board().tiles().filter(|t| t.is_open()).count(), 0);
    }

    #[test]
    fn test_pointer_up_dispatch() {
        let mut game = Game::with_seed(Difficulty::Easy, 5).unwrap();
        game.pointer_up(Hit::Difficulty(Difficulty::Medium)).unwrap();
        assert_eq!(game.difficulty(), Difficulty::Medium);
        game.pointer_up(Hit::Tile((0, 0))).unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        game.pointer_up(Hit::NewGame).unwrap();
        assert_eq!(game.phase(), Phase::Ready);
        assert_eq!(game.board().mine_count(), 40);
        game.pointer_up(Hit::Nothing).unwrap();
        assert_eq!(game.phase(), Phase::Ready);
    }

    #[test]
    fn test_difficulty_serde_by_name() {
        #[derive(Serialize, Deserialize)]
        struct Wrap {
            difficulty: Difficulty,
        }
        let s = toml::to_string(&Wrap { difficulty: Difficulty::Hard }).unwrap();
        assert_eq!(s.trim(), "difficulty = \"Hard\"");
        let w: Wrap = toml::from_str("difficulty = \"medium\"").unwrap();
        assert_eq!(w.difficulty, Difficulty::Medium);
        assert!(toml::from_str::<Wrap>("difficulty = \"Extreme\"").is_err());
    }
}
