//! Bricks and the brick grid
//!
//! Bricks live in a fixed grid of cells. A ball position maps to a cell by
//! dividing by the cell pitch (brick size plus gap).

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Brick kinds with their durability and value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrickType {
    White,
    Orange,
    Cyan,
    Green,
    Red,
    Blue,
    Magenta,
    Yellow,
    Grey,
    Silver,
    /// Cannot be destroyed, doesn't count for level clear
    Gold,
}

impl BrickType {
    pub const ALL: [BrickType; 11] = [
        BrickType::White,
        BrickType::Orange,
        BrickType::Cyan,
        BrickType::Green,
        BrickType::Red,
        BrickType::Blue,
        BrickType::Magenta,
        BrickType::Yellow,
        BrickType::Grey,
        BrickType::Silver,
        BrickType::Gold,
    ];

    /// Hits needed to destroy the brick (None = indestructible)
    pub fn required_hits(&self) -> Option<u8> {
        match self {
            BrickType::Silver => Some(2),
            BrickType::Gold => None,
            _ => Some(1),
        }
    }

    /// Points awarded when the brick is destroyed
    pub fn points(&self) -> u64 {
        match self {
            BrickType::White => 50,
            BrickType::Orange => 60,
            BrickType::Cyan => 70,
            BrickType::Green => 80,
            BrickType::Red => 90,
            BrickType::Blue => 100,
            BrickType::Magenta => 110,
            BrickType::Yellow => 120,
            BrickType::Grey => 50,
            BrickType::Silver => 150,
            BrickType::Gold => 0,
        }
    }

    /// Two-letter code used by level files
    pub fn code(&self) -> &'static str {
        match self {
            BrickType::White => "WH",
            BrickType::Orange => "OR",
            BrickType::Cyan => "CY",
            BrickType::Green => "GR",
            BrickType::Red => "RE",
            BrickType::Blue => "BL",
            BrickType::Magenta => "MA",
            BrickType::Yellow => "YE",
            BrickType::Grey => "GY",
            BrickType::Silver => "SI",
            BrickType::Gold => "GO",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn is_destructible(&self) -> bool {
        self.required_hits().is_some()
    }
}

/// Power carried by a brick, released as a falling pill on destruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerType {
    #[default]
    None,
    Slow,
    Catch,
    Laser,
    Enlarge,
    Disruption,
    Break,
    Player,
}

impl PowerType {
    pub const ALL: [PowerType; 8] = [
        PowerType::None,
        PowerType::Slow,
        PowerType::Catch,
        PowerType::Laser,
        PowerType::Enlarge,
        PowerType::Disruption,
        PowerType::Break,
        PowerType::Player,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PowerType::None => "NO",
            PowerType::Slow => "SL",
            PowerType::Catch => "CA",
            PowerType::Laser => "LA",
            PowerType::Enlarge => "EN",
            PowerType::Disruption => "DI",
            PowerType::Break => "BR",
            PowerType::Player => "PL",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

/// A single brick in the layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    pub kind: BrickType,
    pub power: PowerType,
    /// Hits taken so far
    pub hits: u8,
}

impl Brick {
    pub fn new(kind: BrickType, power: PowerType) -> Self {
        Self {
            kind,
            power,
            hits: 0,
        }
    }

    /// Register one hit, returns the hits still needed (0 once destroyed)
    pub fn register_hit(&mut self) -> u8 {
        if self.kind.is_destructible() {
            self.hits = self.hits.saturating_add(1);
        }
        self.remaining_hits()
    }

    /// Hits still needed to destroy this brick (u8::MAX for indestructible)
    pub fn remaining_hits(&self) -> u8 {
        match self.kind.required_hits() {
            Some(required) => required.saturating_sub(self.hits),
            None => u8::MAX,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.remaining_hits() == 0
    }

    pub fn points(&self) -> u64 {
        self.kind.points()
    }

    /// Four-letter code: brick type followed by power type (e.g. `SINO`)
    pub fn short_code(&self) -> String {
        format!("{}{}", self.kind.code(), self.power.code())
    }
}

/// Outcome of hitting a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickHit {
    pub kind: BrickType,
    pub power: PowerType,
    pub destroyed: bool,
    /// Points awarded (non-zero only when destroyed)
    pub points: u64,
}

/// Grid of optional bricks, `BRICK_ROWS` x `BRICK_COLUMNS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickLayout {
    cells: Vec<Vec<Option<Brick>>>,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickLayout {
    /// Empty layout
    pub fn new() -> Self {
        Self {
            cells: vec![vec![None; BRICK_COLUMNS]; BRICK_ROWS],
        }
    }

    /// Build a layout from rows; short rows/missing rows stay empty, excess is ignored
    pub fn from_rows(rows: Vec<Vec<Option<Brick>>>) -> Self {
        let mut layout = Self::new();
        for (row, cells) in rows.into_iter().take(BRICK_ROWS).enumerate() {
            for (col, cell) in cells.into_iter().take(BRICK_COLUMNS).enumerate() {
                layout.cells[row][col] = cell;
            }
        }
        layout
    }

    /// Distance between the top edges of two consecutive rows
    #[inline]
    pub fn row_pitch() -> f32 {
        BRICK_HEIGHT + BRICK_GAP
    }

    /// Distance between the left edges of two consecutive columns
    #[inline]
    pub fn column_pitch() -> f32 {
        BRICK_WIDTH + BRICK_GAP
    }

    /// Row index containing pixel `y`, if inside the grid
    pub fn row_at(y: f32) -> Option<usize> {
        let row = (y / Self::row_pitch()).floor();
        (row >= 0.0 && row < BRICK_ROWS as f32).then_some(row as usize)
    }

    /// Column index containing pixel `x`, if inside the grid
    pub fn column_at(x: f32) -> Option<usize> {
        let col = (x / Self::column_pitch()).floor();
        (col >= 0.0 && col < BRICK_COLUMNS as f32).then_some(col as usize)
    }

    /// Cell containing the pixel position, if inside the grid
    pub fn cell_at(x: f32, y: f32) -> Option<(usize, usize)> {
        Some((Self::row_at(y)?, Self::column_at(x)?))
    }

    /// Pixel bounds of a cell's brick
    pub fn brick_rect(row: usize, col: usize) -> Rect {
        Rect::new(
            col as f32 * Self::column_pitch(),
            row as f32 * Self::row_pitch(),
            BRICK_WIDTH,
            BRICK_HEIGHT,
        )
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Brick> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    pub fn set(&mut self, row: usize, col: usize, brick: Option<Brick>) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = brick;
        }
    }

    /// Hit the brick in a cell; destroyed bricks are removed from the grid
    pub fn hit(&mut self, row: usize, col: usize) -> Option<BrickHit> {
        let cell = self.cells.get_mut(row)?.get_mut(col)?;
        let brick = cell.as_mut()?;
        brick.register_hit();

        let destroyed = brick.is_destroyed();
        let hit = BrickHit {
            kind: brick.kind,
            power: brick.power,
            destroyed,
            points: if destroyed { brick.points() } else { 0 },
        };
        if destroyed {
            *cell = None;
        }
        Some(hit)
    }

    /// Number of bricks that must still be destroyed to clear the level
    pub fn remaining(&self) -> usize {
        self.iter().filter(|(_, _, b)| b.kind.is_destructible()).count()
    }

    /// All bricks with their cell coordinates, row-major
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Brick)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.as_ref().map(|b| (row, col, b)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_hit() {
        let mut brick = Brick::new(BrickType::Silver, PowerType::None);
        let remaining = brick.remaining_hits();
        let new_remaining = brick.register_hit();
        assert_eq!(remaining - new_remaining, 1);
        assert_eq!(brick.hits, 1);
    }

    #[test]
    fn test_single_hit_brick() {
        let mut brick = Brick::new(BrickType::Grey, PowerType::None);
        assert_eq!(brick.hits, 0);
        brick.register_hit();
        assert_eq!(brick.remaining_hits(), 0);
        assert!(brick.is_destroyed());
    }

    #[test]
    fn test_silver_destroyed_at_threshold() {
        let mut brick = Brick::new(BrickType::Silver, PowerType::None);
        let needed = brick.remaining_hits();
        for _ in 0..needed - 1 {
            brick.register_hit();
            assert!(!brick.is_destroyed());
        }
        brick.register_hit();
        assert!(brick.is_destroyed());
        assert_eq!(brick.points(), 150);
    }

    #[test]
    fn test_gold_is_indestructible() {
        let mut brick = Brick::new(BrickType::Gold, PowerType::None);
        for _ in 0..10 {
            brick.register_hit();
        }
        assert!(!brick.is_destroyed());
        assert_eq!(brick.hits, 0);
    }

    #[test]
    fn test_short_code() {
        let brick = Brick::new(BrickType::Silver, PowerType::None);
        assert_eq!(brick.short_code(), "SINO");
        let brick = Brick::new(BrickType::Red, PowerType::Catch);
        assert_eq!(brick.short_code(), "RECA");
    }

    #[test]
    fn test_codes_are_unique_and_parse_back() {
        for kind in BrickType::ALL {
            assert_eq!(BrickType::from_code(kind.code()), Some(kind));
        }
        for power in PowerType::ALL {
            assert_eq!(PowerType::from_code(power.code()), Some(power));
        }
        assert_eq!(BrickType::from_code("XX"), None);
    }

    #[test]
    fn test_equality() {
        let a = Brick::new(BrickType::Silver, PowerType::None);
        let mut b = Brick::new(BrickType::Silver, PowerType::None);
        assert_eq!(a, b);
        b.register_hit();
        assert_ne!(a, b);
        assert_ne!(a, Brick::new(BrickType::Silver, PowerType::Catch));
        assert_ne!(a, Brick::new(BrickType::Grey, PowerType::None));
    }

    #[test]
    fn test_cell_addressing() {
        assert_eq!(BrickLayout::cell_at(0.0, 0.0), Some((0, 0)));
        // Second column starts after one brick width plus the gap
        assert_eq!(BrickLayout::column_at(59.9), Some(0));
        assert_eq!(BrickLayout::column_at(60.0), Some(1));
        assert_eq!(BrickLayout::row_at(22.0), Some(1));
        assert_eq!(BrickLayout::row_at(-0.5), None);
        assert_eq!(BrickLayout::column_at(780.0), None);
        assert_eq!(BrickLayout::row_at(18.0 * 22.0), None);
    }

    #[test]
    fn test_layout_hit_removes_destroyed() {
        let mut layout = BrickLayout::new();
        layout.set(2, 3, Some(Brick::new(BrickType::Silver, PowerType::Laser)));
        layout.set(0, 0, Some(Brick::new(BrickType::Gold, PowerType::None)));
        assert_eq!(layout.remaining(), 1);

        let first = layout.hit(2, 3).unwrap();
        assert!(!first.destroyed);
        assert_eq!(first.points, 0);
        assert!(layout.get(2, 3).is_some());

        let second = layout.hit(2, 3).unwrap();
        assert!(second.destroyed);
        assert_eq!(second.points, 150);
        assert_eq!(second.power, PowerType::Laser);
        assert!(layout.get(2, 3).is_none());
        assert_eq!(layout.remaining(), 0);

        assert!(layout.hit(5, 5).is_none());
        assert!(layout.hit(99, 0).is_none());
    }

    #[test]
    fn test_from_rows_pads_and_truncates() {
        let row = vec![Some(Brick::new(BrickType::Red, PowerType::None)); BRICK_COLUMNS + 3];
        let layout = BrickLayout::from_rows(vec![row]);
        assert!(layout.get(BRICK_ROWS - 1, 0).is_none());
        assert_eq!(layout.remaining(), BRICK_COLUMNS);
    }

    #[test]
    fn test_brick_rect() {
        let rect = BrickLayout::brick_rect(1, 2);
        assert_eq!(rect, Rect::new(120.0, 22.0, BRICK_WIDTH, BRICK_HEIGHT));
    }
}
