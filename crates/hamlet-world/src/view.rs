//! The read-only world query interface consumed by the simulation core.

use hamlet_types::TileKind;

/// Read-only view of the world grid.
///
/// Implementations must be shareable across the planning tasks of a step,
/// hence the `Send + Sync` bound. Coordinates are signed so that candidate
/// moves off the map can be asked about directly.
pub trait WorldView: Send + Sync {
    /// Number of columns.
    fn width(&self) -> u32;

    /// Number of rows.
    fn height(&self) -> u32;

    /// The tile at `(x, y)`, or `None` outside the grid.
    fn tile_kind_at(&self, x: i32, y: i32) -> Option<TileKind>;

    /// Whether `(x, y)` lies inside the grid.
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        let (Ok(col), Ok(row)) = (u32::try_from(x), u32::try_from(y)) else {
            return false;
        };
        col < self.width() && row < self.height()
    }

    /// Whether an agent may stand on `(x, y)`. Out-of-bounds is never walkable.
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile_kind_at(x, y).is_some_and(TileKind::is_walkable)
    }

    /// The background tile kind that vision snapshots leave out.
    fn default_tile(&self) -> TileKind {
        TileKind::Grass
    }

    /// Free-text description of notable features, if the world offers one.
    fn layout_summary(&self) -> Option<String> {
        None
    }
}

/// Describe a world for daily planning, falling back to its dimensions.
pub fn describe_layout(world: &dyn WorldView) -> String {
    world.layout_summary().unwrap_or_else(|| {
        format!(
            "Grid of size {}x{} with designated features.",
            world.width(),
            world.height()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl WorldView for Plain {
        fn width(&self) -> u32 {
            4
        }
        fn height(&self) -> u32 {
            3
        }
        fn tile_kind_at(&self, x: i32, y: i32) -> Option<TileKind> {
            self.in_bounds(x, y).then_some(TileKind::Grass)
        }
    }

    #[test]
    fn describe_layout_falls_back_to_dimensions() {
        assert_eq!(
            describe_layout(&Plain),
            "Grid of size 4x3 with designated features."
        );
    }

    #[test]
    fn bounds_reject_negative_and_overflowing() {
        let w = Plain;
        assert!(w.in_bounds(0, 0));
        assert!(w.in_bounds(3, 2));
        assert!(!w.in_bounds(-1, 0));
        assert!(!w.in_bounds(4, 0));
        assert!(!w.in_bounds(0, 3));
        assert!(!w.is_walkable(-1, 0));
    }
}
