//! Grid vocabulary: tile kinds, positions, and movement directions.
//!
//! The village is a rectangular grid of tiles addressed by `(x, y)` with
//! the origin in the corner. Moving `up` increases `y`, moving `down`
//! decreases it; `left` and `right` step along `x`.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Tile kinds
// ---------------------------------------------------------------------------

/// The terrain or furniture occupying a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TileKind {
    // --- Open ground ---
    /// Default ground covering most of the map.
    Grass,
    /// Tilled farm soil.
    Soil,
    /// Packed dirt path.
    Path,
    /// Indoor floor boards.
    Floor,
    /// Beach sand along the river.
    Sand,
    /// Wooden bridge over water.
    Bridge,

    // --- Obstacles ---
    /// River water.
    Water,
    /// Decorative bush.
    Bush,
    /// Building wall.
    Wall,

    // --- Furniture ---
    /// Head of a bed.
    BedTop,
    /// Foot of a bed.
    BedBottom,
    /// Upper half of a bench.
    BenchTop,
    /// Lower half of a bench.
    BenchBottom,
    /// Top segment of a shop counter.
    CounterTop,
    /// Middle segment of a shop counter.
    CounterMiddle,
    /// Bottom segment of a shop counter.
    CounterBottom,
    /// Produce bin holding apples.
    BinApple,
    /// Produce bin holding cucumbers.
    BinCucumber,
    /// Produce bin holding eggplants.
    BinEggplant,
    /// Produce bin holding potatoes.
    BinPotato,

    // --- Trees ---
    /// Oak tree.
    TreeOak,
    /// Pine tree.
    TreePine,
    /// Orange tree.
    TreeOrange,
    /// Pink blossom tree.
    TreePink,
    /// Purple blossom tree.
    TreePurple,
}

impl TileKind {
    /// Whether an agent may stand on this tile.
    pub const fn is_walkable(self) -> bool {
        matches!(
            self,
            Self::Grass
                | Self::Soil
                | Self::Path
                | Self::Floor
                | Self::Sand
                | Self::Bridge
                | Self::BedTop
                | Self::BedBottom
                | Self::BenchTop
                | Self::BenchBottom
        )
    }

    /// One-character glyph used by the ASCII map renderer.
    pub const fn symbol(self) -> char {
        match self {
            Self::Grass => '.',
            Self::Soil => ',',
            Self::Path => ':',
            Self::Floor => '_',
            Self::Sand => 's',
            Self::Bridge => '=',
            Self::Water => '~',
            Self::Bush => '*',
            Self::Wall => '#',
            Self::BedTop | Self::BedBottom => 'b',
            Self::BenchTop | Self::BenchBottom => 'n',
            Self::CounterTop | Self::CounterMiddle | Self::CounterBottom => 'c',
            Self::BinApple | Self::BinCucumber | Self::BinEggplant | Self::BinPotato => 'o',
            Self::TreeOak
            | Self::TreePine
            | Self::TreeOrange
            | Self::TreePink
            | Self::TreePurple => 'T',
        }
    }

    /// Human-readable label used in prompts and summaries.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Soil => "soil",
            Self::Path => "path",
            Self::Floor => "floor",
            Self::Sand => "sand",
            Self::Bridge => "bridge",
            Self::Water => "water",
            Self::Bush => "bush",
            Self::Wall => "wall",
            Self::BedTop | Self::BedBottom => "bed",
            Self::BenchTop | Self::BenchBottom => "bench",
            Self::CounterTop | Self::CounterMiddle | Self::CounterBottom => "counter",
            Self::BinApple => "apple bin",
            Self::BinCucumber => "cucumber bin",
            Self::BinEggplant => "eggplant bin",
            Self::BinPotato => "potato bin",
            Self::TreeOak => "oak tree",
            Self::TreePine => "pine tree",
            Self::TreeOrange => "orange tree",
            Self::TreePink => "pink tree",
            Self::TreePurple => "purple tree",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A grid coordinate.
///
/// Signed so that a candidate move off the edge of the map (e.g. `left`
/// from `x = 0`) is representable and can be rejected by bounds checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing upward.
    pub y: i32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`.
    ///
    /// Returns `None` only when the coordinate arithmetic would overflow.
    pub const fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        let Some(x) = self.x.checked_add(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add(dy) else {
            return None;
        };
        Some(Self { x, y })
    }

    /// Chebyshev (king-move) distance to `other`, saturating on overflow.
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the four cardinal moves an agent may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// `y + 1`.
    Up,
    /// `y - 1`.
    Down,
    /// `x - 1`.
    Left,
    /// `x + 1`.
    Right,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Parse a direction word as produced by the oracle.
    ///
    /// Surrounding whitespace and ASCII case are ignored; anything other
    /// than the four direction words yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let word = raw.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(word))
    }

    /// Lowercase wire name of the direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Coordinate offset `(dx, dy)` applied by this move.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_increases_y_and_left_decreases_x() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Direction::Up), Some(Position::new(2, 3)));
        assert_eq!(origin.step(Direction::Down), Some(Position::new(2, 1)));
        assert_eq!(origin.step(Direction::Left), Some(Position::new(1, 2)));
        assert_eq!(origin.step(Direction::Right), Some(Position::new(3, 2)));
    }

    #[test]
    fn step_off_the_edge_goes_negative() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Left), Some(Position::new(-1, 0)));
    }

    #[test]
    fn step_overflow_is_none() {
        let far = Position::new(i32::MAX, 0);
        assert_eq!(far.step(Direction::Right), None);
    }

    #[test]
    fn parse_direction_words() {
        assert_eq!(Direction::parse("up"), Some(Direction::Up));
        assert_eq!(Direction::parse(" Left "), Some(Direction::Left));
        assert_eq!(Direction::parse("north"), None);
        assert_eq!(Direction::parse(""), None);
    }

    #[test]
    fn chebyshev_distance_takes_larger_axis() {
        let a = Position::new(1, 1);
        assert_eq!(a.chebyshev_distance(Position::new(4, 2)), 3);
        assert_eq!(a.chebyshev_distance(Position::new(0, -4)), 5);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn walkability_matches_terrain() {
        assert!(TileKind::Grass.is_walkable());
        assert!(TileKind::Bridge.is_walkable());
        assert!(TileKind::BedTop.is_walkable());
        assert!(!TileKind::Water.is_walkable());
        assert!(!TileKind::Wall.is_walkable());
        assert!(!TileKind::CounterMiddle.is_walkable());
        assert!(!TileKind::TreePine.is_walkable());
    }

    #[test]
    fn direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Right).unwrap_or_default();
        assert_eq!(json, "\"right\"");
    }
}
