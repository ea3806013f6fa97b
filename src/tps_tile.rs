// Single board tile: mine flag, open/mark state and the prime gesture
// A tile is opened by touching it twice within the confirmation window;
// letting the window lapse cycles its mark instead

use std::time::Duration;

use crate::tps_error::{GameError, Result};

/// Time a primed tile waits for the confirming second touch
pub const PRIME_WINDOW: Duration = Duration::from_millis(600);

/// Grid position as (x, y)
pub type Pos = (usize, usize);

/// Player mark on an unopened tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    #[default]
    Blank,
    Flagged,
    Questioned,
}

impl Mark {
    /// Next mark in the lapse cycle: none → flag → question → none
    pub fn cycled(self) -> Mark {
        match self {
            Mark::Blank => Mark::Flagged,
            Mark::Flagged => Mark::Questioned,
            Mark::Questioned => Mark::Blank,
        }
    }
}

/// What a touch did to the tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Ignored, // Tile already open
    Primed,  // First touch, waiting for confirmation
    Confirm, // Second touch inside the window, caller should open
}

/// Read-only visual state for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileView {
    Unopened { primed: bool },
    Flagged { primed: bool },
    Questioned { primed: bool },
    Number(u8),
    Mine,
}

#[derive(Debug, Clone)]
pub struct Tile {
    pos: Pos,
    armed: bool,
    opened: bool,
    mark: Mark,
    adjacent: Option<u8>, // Only set once opened and safe
    primed: bool,
    prime_elapsed: Duration,
}

impl Tile {
    pub fn new(pos: Pos) -> Self {
        Tile {
            pos,
            armed: false,
            opened: false,
            mark: Mark::Blank,
            adjacent: None,
            primed: false,
            prime_elapsed: Duration::ZERO,
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn is_mine(&self) -> bool {
        self.armed
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    #[cfg(test)]
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Adjacent mine count, defined only for opened safe tiles
    #[cfg(test)]
    pub fn adjacent_mines(&self) -> Option<u8> {
        self.adjacent
    }

    /// First touch primes the tile, a second touch asks for it to be opened
    pub fn touch(&mut self) -> TouchAction {
        if self.opened {
            return TouchAction::Ignored;
        }
        if self.primed {
            TouchAction::Confirm
        } else {
            self.primed = true;
            self.prime_elapsed = Duration::ZERO;
            TouchAction::Primed
        }
    }

    /// Advance the prime timer; returns the new mark when the window lapsed
    pub fn tick(&mut self, dt: Duration) -> Option<Mark> {
        if self.opened || !self.primed {
            return None;
        }
        self.prime_elapsed += dt;
        if self.prime_elapsed < PRIME_WINDOW {
            return None;
        }
        self.primed = false;
        self.prime_elapsed = Duration::ZERO;
        self.mark = self.mark.cycled();
        Some(self.mark)
    }

    /// Place a mine here. Setup only: an opened tile cannot be armed.
    pub fn arm(&mut self) -> Result<()> {
        if self.opened {
            return Err(GameError::ArmOpenedTile);
        }
        self.armed = true;
        Ok(())
    }

    /// Drop a pending prime without opening
    pub(crate) fn cancel_prime(&mut self) {
        self.primed = false;
        self.prime_elapsed = Duration::ZERO;
    }

    /// Mark the tile open. Marks are cleared and frozen from here on.
    pub(crate) fn uncover(&mut self) {
        self.opened = true;
        self.mark = Mark::Blank;
        self.cancel_prime();
    }

    pub(crate) fn set_adjacent(&mut self, count: u8) {
        debug_assert!(self.opened && !self.armed);
        self.adjacent = Some(count);
    }

    pub fn view(&self) -> TileView {
        if self.opened {
            return match self.adjacent {
                Some(n) if !self.armed => TileView::Number(n),
                _ => TileView::Mine,
            };
        }
        let primed = self.primed;
        match self.mark {
            Mark::Blank => TileView::Unopened { primed },
            Mark::Flagged => TileView::Flagged { primed },
            Mark::Questioned => TileView::Questioned { primed },
        }
    }
}
