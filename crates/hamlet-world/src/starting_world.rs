//! Default starting town for the Hamlet simulation.
//!
//! A 48x27 grass field crossed by a three-row river with two bridges.
//! North of the river sit the walled apartments with their floors and
//! paths, and the general store; south of it lie the farm plots and a
//! stepped sand beach.

use hamlet_types::TileKind;
use tracing::debug;

use crate::error::WorldError;
use crate::tile_map::TileMap;

/// Width of the starting town in tiles.
pub const TOWN_WIDTH: u32 = 48;

/// Height of the starting town in tiles.
pub const TOWN_HEIGHT: u32 = 27;

/// A rectangle fill: `(x, y, width, height, kind)`.
type Rect = (i32, i32, u32, u32, TileKind);

/// Rectangles painted in order over the grass base. Later entries win.
const TOWN_RECTS: &[Rect] = &[
    // River
    (0, 11, TOWN_WIDTH, 3, TileKind::Water),
    // Farm plots
    (1, 15, 5, 5, TileKind::Soil),
    (1, 21, 5, 5, TileKind::Soil),
    (7, 21, 5, 5, TileKind::Soil),
    (13, 21, 5, 5, TileKind::Soil),
    (19, 21, 5, 5, TileKind::Soil),
    // Bridges
    (8, 11, 3, 3, TileKind::Bridge),
    (37, 11, 3, 3, TileKind::Bridge),
    // Apartments
    (0, 0, 21, 5, TileKind::Wall),
    (0, 5, 5, 5, TileKind::Wall),
    (1, 1, 4, 3, TileKind::Floor),
    (7, 1, 3, 3, TileKind::Floor),
    (12, 1, 3, 3, TileKind::Floor),
    (17, 1, 3, 3, TileKind::Floor),
    (1, 6, 3, 3, TileKind::Floor),
    // Store
    (33, 1, 14, 9, TileKind::Wall),
    (34, 2, 12, 7, TileKind::Floor),
    // Paths
    (4, 5, 2, 2, TileKind::Path),
    (6, 6, 9, 4, TileKind::Path),
    (9, 4, 1, 2, TileKind::Path),
    (14, 4, 1, 2, TileKind::Path),
    (4, 4, 1, 1, TileKind::Path),
    (15, 6, 19, 1, TileKind::Path),
    (8, 10, 3, 1, TileKind::Path),
    (37, 9, 3, 2, TileKind::Path),
];

/// Single bushes lining the apartment paths.
const BUSHES: &[(i32, i32)] = &[
    (5, 7),
    (6, 5),
    (8, 5),
    (10, 5),
    (13, 5),
    (15, 5),
    (18, 5),
    (20, 5),
];

/// Beach rows, each narrower than the one before.
const BEACH: &[Rect] = &[
    (14, 14, 19, 1, TileKind::Sand),
    (15, 15, 17, 1, TileKind::Sand),
    (16, 16, 15, 1, TileKind::Sand),
];

/// Build the starting town map.
///
/// # Errors
///
/// Returns a [`WorldError`] if a fixed feature falls outside the grid.
pub fn create_town_map() -> Result<TileMap, WorldError> {
    let mut map = TileMap::new(TOWN_WIDTH, TOWN_HEIGHT, TileKind::Grass)?;

    for &(x, y, w, h, kind) in TOWN_RECTS {
        map.fill_rect(x, y, w, h, kind);
    }
    for &(x, y) in BUSHES {
        map.set_tile(x, y, TileKind::Bush)?;
    }
    for &(x, y, w, h, kind) in BEACH {
        map.fill_rect(x, y, w, h, kind);
    }

    debug!(
        width = TOWN_WIDTH,
        height = TOWN_HEIGHT,
        water = map.count(TileKind::Water),
        walls = map.count(TileKind::Wall),
        "Town map created"
    );

    Ok(map)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view::WorldView;

    #[test]
    fn town_has_expected_dimensions() {
        let map = create_town_map().unwrap();
        assert_eq!(map.width(), 48);
        assert_eq!(map.height(), 27);
    }

    #[test]
    fn river_blocks_except_at_bridges() {
        let map = create_town_map().unwrap();
        assert_eq!(map.tile_kind_at(0, 12), Some(TileKind::Water));
        assert!(!map.is_walkable(20, 12));
        assert_eq!(map.tile_kind_at(9, 12), Some(TileKind::Bridge));
        assert!(map.is_walkable(9, 12));
        assert_eq!(map.tile_kind_at(38, 13), Some(TileKind::Bridge));
    }

    #[test]
    fn apartments_are_walled_with_floors() {
        let map = create_town_map().unwrap();
        assert_eq!(map.tile_kind_at(0, 0), Some(TileKind::Wall));
        assert_eq!(map.tile_kind_at(2, 2), Some(TileKind::Floor));
        assert_eq!(map.tile_kind_at(2, 3), Some(TileKind::Floor));
        assert_eq!(map.tile_kind_at(4, 4), Some(TileKind::Path));
        assert_eq!(map.tile_kind_at(5, 7), Some(TileKind::Bush));
    }

    #[test]
    fn store_interior_is_floor() {
        let map = create_town_map().unwrap();
        assert_eq!(map.tile_kind_at(33, 1), Some(TileKind::Wall));
        assert_eq!(map.tile_kind_at(40, 5), Some(TileKind::Floor));
        assert_eq!(map.tile_kind_at(38, 9), Some(TileKind::Path));
    }

    #[test]
    fn beach_and_farms_are_walkable() {
        let map = create_town_map().unwrap();
        assert_eq!(map.tile_kind_at(20, 14), Some(TileKind::Sand));
        assert_eq!(map.tile_kind_at(15, 16), Some(TileKind::Grass));
        assert_eq!(map.tile_kind_at(3, 17), Some(TileKind::Soil));
        assert!(map.is_walkable(3, 17));
    }

    #[test]
    fn layout_summary_mentions_water() {
        let map = create_town_map().unwrap();
        let summary = map.layout_summary().unwrap_or_default();
        assert!(summary.contains("Grid of size 48x27"));
        assert!(summary.contains("water spans x 0-47, y 11-13"));
    }
}
