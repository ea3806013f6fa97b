// Board: tile grid, mine placement, adjacency counting and flood-fill opening
// Also exposes the loss / win predicates the game session checks

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, trace};
use rand::Rng;
use rand::seq::index;

use crate::tps_error::{GameError, Result};
use crate::tps_game::Difficulty;
use crate::tps_tile::{Mark, Pos, Tile, TouchAction};

/// Fixed board width in tiles
pub const BOARD_W: usize = 20;
/// Fixed board height in tiles
pub const BOARD_H: usize = 20;

/// Validated board dimensions and mine count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    w: usize,
    h: usize,
    mines: usize,
}

impl BoardConfig {
    /// Reject empty boards and boards with no room for a single safe tile
    pub fn new(w: usize, h: usize, mines: usize) -> Result<Self> {
        if w == 0 || h == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        let cells = w * h;
        if mines >= cells {
            return Err(GameError::TooManyMines { mines, cells });
        }
        Ok(BoardConfig { w, h, mines })
    }

    /// The standard 20x20 board for a difficulty preset
    pub fn standard(difficulty: Difficulty) -> Result<Self> {
        BoardConfig::new(BOARD_W, BOARD_H, difficulty.mine_count())
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn mines(&self) -> usize {
        self.mines
    }
}

/// Result of trying to open a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,        // Already open
    Blocked,         // Flagged, prime cancelled instead
    Revealed(usize), // Number of safe tiles opened, flood fill included
    Detonated,       // Opened a mine
}

/// Result of a touch routed through the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    Ignored,
    Primed,
    Opened(OpenOutcome),
}

impl TouchOutcome {
    /// A touch that reached an unopened tile
    pub fn is_effective(self) -> bool {
        !matches!(self, TouchOutcome::Ignored)
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    w: usize,
    h: usize,
    tiles: Vec<Tile>,     // Row-major, index = y * w + x
    mine_count: usize,
    safe_opened: usize,   // Open non-mine tiles
    win_threshold: usize, // cells - mines
}

impl Board {
    /// Create an unarmed board of the configured size
    fn blank(config: BoardConfig) -> Self {
        let (w, h) = (config.width(), config.height());
        let mut tiles = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                tiles.push(Tile::new((x, y)));
            }
        }
        Board {
            w,
            h,
            tiles,
            mine_count: 0,
            safe_opened: 0,
            win_threshold: w * h,
        }
    }

    /// Build a board with mines placed uniformly at random
    pub fn generate<R: Rng + ?Sized>(config: BoardConfig, rng: &mut R) -> Result<Self> {
        let w = config.width();
        // sample without replacement, so every tile is equally likely
        let mines: Vec<Pos> = index::sample(rng, w * config.height(), config.mines())
            .into_iter()
            .map(|i| (i % w, i / w))
            .collect();
        let board = Board::with_mines(w, config.height(), &mines)?;
        debug!("armed {} of {} tiles", mines.len(), board.tiles.len());
        Ok(board)
    }

    /// Build a board with mines at fixed positions
    pub fn with_mines(w: usize, h: usize, mines: &[Pos]) -> Result<Self> {
        let config = BoardConfig::new(w, h, mines.len())?;
        let mut board = Board::blank(config);
        for &pos in mines {
            let i = board.checked_index(pos)?;
            if board.tiles[i].is_mine() {
                return Err(GameError::DuplicateMine);
            }
            board.tiles[i].arm()?;
        }
        board.set_mine_count(mines.len());
        Ok(board)
    }

    /// Clear every tile and re-arm the board for a difficulty
    pub fn reset<R: Rng + ?Sized>(&mut self, difficulty: Difficulty, rng: &mut R) -> Result<()> {
        let config = BoardConfig::new(self.w, self.h, difficulty.mine_count())?;
        *self = Board::generate(config, rng)?;
        Ok(())
    }

    fn set_mine_count(&mut self, mines: usize) {
        self.mine_count = mines;
        self.safe_opened = 0;
        self.win_threshold = self.tiles.len() - mines;
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    #[cfg(test)]
    pub fn safe_opened(&self) -> usize {
        self.safe_opened
    }

    #[cfg(test)]
    pub fn win_threshold(&self) -> usize {
        self.win_threshold
    }

    /// Convert (x, y) coordinates to flat array index
    fn index(&self, (x, y): Pos) -> usize {
        y * self.w + x
    }

    fn checked_index(&self, pos: Pos) -> Result<usize> {
        if pos.0 < self.w && pos.1 < self.h {
            Ok(self.index(pos))
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    #[cfg(test)]
    pub fn tile(&self, pos: Pos) -> Result<&Tile> {
        let i = self.checked_index(pos)?;
        Ok(&self.tiles[i])
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// In-bounds neighbours of a tile, up to 8
    pub fn neighbors(&self, (x, y): Pos) -> impl Iterator<Item = Pos> + use<> {
        let (w, h) = (self.w, self.h);
        let xs = x.saturating_sub(1)..=(x + 1).min(w - 1);
        let ys = y.saturating_sub(1)..=(y + 1).min(h - 1);
        ys.flat_map(move |oy| xs.clone().map(move |ox| (ox, oy)))
            .filter(move |&p| p != (x, y))
    }

    /// Number of armed tiles around a position
    pub fn adjacent_mine_count(&self, pos: Pos) -> u8 {
        self.neighbors(pos)
            .filter(|&n| self.tiles[self.index(n)].is_mine())
            .count() as u8
    }

    /// Route a touch to a tile; a confirming second touch opens it
    pub fn touch(&mut self, pos: Pos) -> Result<TouchOutcome> {
        let i = self.checked_index(pos)?;
        Ok(match self.tiles[i].touch() {
            TouchAction::Ignored => TouchOutcome::Ignored,
            TouchAction::Primed => {
                trace!("primed {:?}", pos);
                TouchOutcome::Primed
            }
            TouchAction::Confirm => TouchOutcome::Opened(self.open(pos)?),
        })
    }

    /// Open a tile, flooding outwards from zero-count tiles
    pub fn open(&mut self, pos: Pos) -> Result<OpenOutcome> {
        let i = self.checked_index(pos)?;
        let tile = &mut self.tiles[i];
        if tile.is_open() {
            return Ok(OpenOutcome::NoChange);
        }
        if tile.mark() == Mark::Flagged {
            tile.cancel_prime();
            return Ok(OpenOutcome::Blocked);
        }
        if tile.is_mine() {
            tile.uncover();
            debug!("mine opened at {:?}", pos);
            return Ok(OpenOutcome::Detonated);
        }

        let mut opened = 0;
        let mut queue = VecDeque::from([pos]);
        while let Some(p) = queue.pop_front() {
            let i = self.index(p);
            let tile = &mut self.tiles[i];
            if tile.is_open() {
                continue;
            }
            if tile.mark() == Mark::Flagged {
                tile.cancel_prime();
                continue;
            }
            // zero-count tiles never border a mine, so the fill stays safe
            debug_assert!(!tile.is_mine());
            tile.uncover();
            let count = self.adjacent_mine_count(p);
            self.tiles[i].set_adjacent(count);
            self.safe_opened += 1;
            opened += 1;
            if count == 0 {
                let closed: Vec<Pos> = self
                    .neighbors(p)
                    .filter(|&n| !self.tiles[self.index(n)].is_open())
                    .collect();
                queue.extend(closed);
            }
        }
        if opened > 1 {
            debug!("flood fill from {:?} opened {} tiles", pos, opened);
        }
        Ok(OpenOutcome::Revealed(opened))
    }

    /// Advance every tile's prime timer
    pub fn tick(&mut self, dt: Duration) {
        for tile in self.tiles.iter_mut() {
            if let Some(mark) = tile.tick(dt) {
                trace!("{:?} lapsed to {:?}", tile.pos(), mark);
            }
        }
    }

    /// True once any mine has been opened
    pub fn poll_loss(&self) -> bool {
        self.tiles.iter().any(|t| t.is_mine() && t.is_open())
    }

    /// True once every safe tile has been opened
    pub fn poll_win(&self) -> bool {
        self.safe_opened >= self.win_threshold
    }

    /// Open all mines after a loss; safe tiles are left as they are
    pub fn reveal_all_mines(&mut self) {
        for tile in self.tiles.iter_mut().filter(|t| t.is_mine()) {
            tile.uncover();
        }
    }
}
