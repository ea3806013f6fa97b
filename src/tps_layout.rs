// Logical 600x400 view: board on the left 400 units, controls on the right 200
// Hit testing maps a pointer position onto a tile or a control

use crate::tps_board::{BOARD_H, BOARD_W};
use crate::tps_game::Difficulty;
use crate::tps_tile::Pos;

pub const VIEW_W: i32 = 600;
pub const VIEW_H: i32 = 400;
/// Points with x up to and including this edge belong to the board
pub const BOARD_EDGE: i32 = 400;
/// Distance between tile centres
pub const TILE_PITCH: i32 = 20;
/// Drawn tile size; the remaining 2 units are a dead gutter
pub const TILE_SIZE: i32 = 18;

const BUTTON_SIZE: i32 = 20;
const HIGHLIGHT_SIZE: i32 = 24;
const DIFFICULTY_ROW_Y: i32 = 50;
const NEW_GAME_ORIGIN: Point = Point { x: 450, y: 80 };
const NEW_GAME_SIZE: (i32, i32) = (100, 22);
pub const TIMER_ORIGIN: Point = Point { x: 425, y: 300 };

/// A position in logical view units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle, right and bottom edges exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Area {
    pub const fn centered(c: Point, w: i32, h: i32) -> Self {
        Area { x: c.x - w / 2, y: c.y - h / 2, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// What a pointer-up landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Tile(Pos),
    Difficulty(Difficulty),
    NewGame,
    Nothing,
}

pub fn tile_area((x, y): Pos) -> Area {
    let c = Point::new(x as i32 * TILE_PITCH + TILE_PITCH / 2, y as i32 * TILE_PITCH + TILE_PITCH / 2);
    Area::centered(c, TILE_SIZE, TILE_SIZE)
}

fn difficulty_center(d: Difficulty) -> Point {
    Point::new(450 + d.level() as i32 * 24, DIFFICULTY_ROW_Y)
}

pub fn difficulty_area(d: Difficulty) -> Area {
    Area::centered(difficulty_center(d), BUTTON_SIZE, BUTTON_SIZE)
}

/// Frame drawn around the selected difficulty button
pub fn highlight_area(selected: Difficulty) -> Area {
    Area::centered(difficulty_center(selected), HIGHLIGHT_SIZE, HIGHLIGHT_SIZE)
}

pub fn new_game_area() -> Area {
    Area {
        x: NEW_GAME_ORIGIN.x,
        y: NEW_GAME_ORIGIN.y,
        w: NEW_GAME_SIZE.0,
        h: NEW_GAME_SIZE.1,
    }
}

/// Resolve a logical point to a tile or control
pub fn hit_test(p: Point) -> Hit {
    if p.x <= BOARD_EDGE {
        if p.x < 0 || p.y < 0 {
            return Hit::Nothing;
        }
        let (x, y) = ((p.x / TILE_PITCH) as usize, (p.y / TILE_PITCH) as usize);
        if x < BOARD_W && y < BOARD_H && tile_area((x, y)).contains(p) {
            return Hit::Tile((x, y));
        }
        return Hit::Nothing;
    }
    if let Some(d) = Difficulty::ALL.into_iter().find(|&d| difficulty_area(d).contains(p)) {
        return Hit::Difficulty(d);
    }
    if new_game_area().contains(p) {
        return Hit::NewGame;
    }
    Hit::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_centres_hit_their_tile() {
        for (x, y) in [(0, 0), (19, 19), (7, 12)] {
            let c = tile_area((x, y)).center();
            assert_eq!(hit_test(c), Hit::Tile((x, y)));
        }
    }

    #[test]
    fn test_gutters_hit_nothing() {
        // left gutter of tile (1, 0) and bottom gutter of tile (0, 0)
        assert_eq!(hit_test(Point::new(20, 10)), Hit::Nothing);
        assert_eq!(hit_test(Point::new(10, 19)), Hit::Nothing);
        assert_eq!(hit_test(Point::new(21, 10)), Hit::Tile((1, 0)));
    }

    #[test]
    fn test_board_edge_belongs_to_board() {
        assert_eq!(hit_test(Point::new(400, 10)), Hit::Nothing);
        assert_eq!(hit_test(Point::new(399, 399)), Hit::Nothing);
        assert_eq!(hit_test(Point::new(-1, 5)), Hit::Nothing);
    }

    #[test]
    fn test_controls() {
        assert_eq!(hit_test(Point::new(474, 50)), Hit::Difficulty(Difficulty::Easy));
        assert_eq!(hit_test(Point::new(498, 41)), Hit::Difficulty(Difficulty::Medium));
        assert_eq!(hit_test(Point::new(522, 59)), Hit::Difficulty(Difficulty::Hard));
        assert_eq!(hit_test(Point::new(486, 50)), Hit::Nothing);
        assert_eq!(hit_test(Point::new(450, 80)), Hit::NewGame);
        assert_eq!(hit_test(new_game_area().center()), Hit::NewGame);
        assert_eq!(hit_test(TIMER_ORIGIN), Hit::Nothing);
    }

    #[test]
    fn test_controls_fit_in_view() {
        let view = Area { x: 0, y: 0, w: VIEW_W, h: VIEW_H };
        let mut areas = vec![new_game_area(), tile_area((BOARD_W - 1, BOARD_H - 1))];
        areas.extend(Difficulty::ALL.into_iter().map(highlight_area));
        for a in areas {
            assert!(view.contains(Point::new(a.x, a.y)));
            assert!(view.contains(Point::new(a.x + a.w - 1, a.y + a.h - 1)));
        }
        // everything right of the board edge is control space
        assert!(new_game_area().x > BOARD_EDGE);
        assert!(difficulty_area(Difficulty::Easy).x > BOARD_EDGE);
    }

    #[test]
    fn test_highlight_surrounds_button() {
        let d = Difficulty::Medium;
        let frame = highlight_area(d);
        let button = difficulty_area(d);
        assert!(frame.x < button.x && frame.x + frame.w > button.x + button.w);
        assert_eq!(frame.center(), button.center());
    }
}
