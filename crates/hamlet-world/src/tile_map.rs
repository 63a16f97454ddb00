//! In-memory tile grid.
//!
//! Tiles are stored row-major with row 0 at the bottom edge, matching the
//! convention that `up` increases `y`. Rectangle fills clip silently at
//! the grid edge; single-tile writes report out-of-bounds coordinates.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use hamlet_types::{Position, TileKind};
use serde::Serialize;

use crate::error::WorldError;
use crate::view::WorldView;

/// A rectangular grid of [`TileKind`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    base: TileKind,
    tiles: Vec<TileKind>,
}

impl TileMap {
    /// Create a grid of the given size covered entirely in `base`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either side is zero.
    pub fn new(width: u32, height: u32, base: TileKind) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        let cells = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(WorldError::ArithmeticOverflow)?;
        Ok(Self {
            width,
            height,
            base,
            tiles: vec![base; cells],
        })
    }

    /// The tile kind the grid was created with.
    pub const fn base(&self) -> TileKind {
        self.base
    }

    /// Row-major index of `(x, y)`, or `None` outside the grid.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let col = usize::try_from(x).ok()?;
        let row = usize::try_from(y).ok()?;
        let width = usize::try_from(self.width).ok()?;
        let height = usize::try_from(self.height).ok()?;
        if col >= width || row >= height {
            return None;
        }
        row.checked_mul(width)?.checked_add(col)
    }

    /// Overwrite a single tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `(x, y)` is outside the grid.
    pub fn set_tile(&mut self, x: i32, y: i32, kind: TileKind) -> Result<(), WorldError> {
        let out_of_bounds = WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        let cell = self
            .index(x, y)
            .and_then(|idx| self.tiles.get_mut(idx))
            .ok_or(out_of_bounds)?;
        *cell = kind;
        Ok(())
    }

    /// Fill a `width` x `height` rectangle whose lowest corner is `(x, y)`.
    ///
    /// Cells falling outside the grid are skipped. Returns how many cells
    /// were written.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, kind: TileKind) -> usize {
        let mut written: usize = 0;
        for dy in 0..height {
            for dx in 0..width {
                let cx = i32::try_from(dx).ok().and_then(|d| x.checked_add(d));
                let cy = i32::try_from(dy).ok().and_then(|d| y.checked_add(d));
                let (Some(cx), Some(cy)) = (cx, cy) else {
                    continue;
                };
                if let Some(cell) = self.index(cx, cy).and_then(|idx| self.tiles.get_mut(idx)) {
                    *cell = kind;
                    written = written.saturating_add(1);
                }
            }
        }
        written
    }

    /// Number of cells holding `kind`.
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| **t == kind).count()
    }

    /// Bounding box (lowest corner, highest corner) of every non-base kind.
    pub fn feature_bounds(&self) -> BTreeMap<TileKind, (Position, Position)> {
        let mut bounds: BTreeMap<TileKind, (Position, Position)> = BTreeMap::new();
        for (pos, kind) in self.cells() {
            if kind == self.base {
                continue;
            }
            bounds
                .entry(kind)
                .and_modify(|(lo, hi)| {
                    lo.x = lo.x.min(pos.x);
                    lo.y = lo.y.min(pos.y);
                    hi.x = hi.x.max(pos.x);
                    hi.y = hi.y.max(pos.y);
                })
                .or_insert((pos, pos));
        }
        bounds
    }

    /// Iterate every cell with its position, bottom row first.
    pub fn cells(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        let width = self.width;
        self.tiles.iter().enumerate().filter_map(move |(idx, kind)| {
            let idx = u32::try_from(idx).ok()?;
            let x = i32::try_from(idx.checked_rem(width)?).ok()?;
            let y = i32::try_from(idx.checked_div(width)?).ok()?;
            Some((Position::new(x, y), *kind))
        })
    }

    /// Render the grid as text, top row first, one glyph per tile.
    pub fn render_ascii(&self) -> String {
        let capacity = self.tiles.len().saturating_add(usize::try_from(self.height).unwrap_or(0));
        let mut out = String::with_capacity(capacity);
        for row in (0..self.height).rev() {
            let Ok(y) = i32::try_from(row) else {
                continue;
            };
            for col in 0..self.width {
                let Ok(x) = i32::try_from(col) else {
                    continue;
                };
                let kind = self.tile_kind_at(x, y).unwrap_or(self.base);
                out.push(kind.symbol());
            }
            out.push('\n');
        }
        out
    }
}

impl WorldView for TileMap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn tile_kind_at(&self, x: i32, y: i32) -> Option<TileKind> {
        self.index(x, y).and_then(|idx| self.tiles.get(idx)).copied()
    }

    fn default_tile(&self) -> TileKind {
        self.base
    }

    fn layout_summary(&self) -> Option<String> {
        let mut summary = format!(
            "Grid of size {}x{} covered in {}.",
            self.width, self.height, self.base
        );
        let bounds = self.feature_bounds();
        if bounds.is_empty() {
            return Some(summary);
        }
        summary.push_str(" Features:");
        for (kind, (lo, hi)) in &bounds {
            let _ = write!(
                summary,
                " {kind} spans x {}-{}, y {}-{};",
                lo.x, hi.x, lo.y, hi.y
            );
        }
        if summary.ends_with(';') {
            summary.pop();
            summary.push('.');
        }
        Some(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(matches!(
            TileMap::new(0, 5, TileKind::Grass),
            Err(WorldError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn set_and_read_tile() {
        let mut map = TileMap::new(4, 3, TileKind::Grass).unwrap();
        assert!(map.set_tile(1, 2, TileKind::Wall).is_ok());
        assert_eq!(map.tile_kind_at(1, 2), Some(TileKind::Wall));
        assert!(!map.is_walkable(1, 2));
        assert!(map.is_walkable(0, 0));
        assert_eq!(map.tile_kind_at(4, 0), None);
    }

    #[test]
    fn set_tile_out_of_bounds_errors() {
        let mut map = TileMap::new(4, 3, TileKind::Grass).unwrap();
        assert!(matches!(
            map.set_tile(-1, 0, TileKind::Wall),
            Err(WorldError::OutOfBounds { x: -1, y: 0, .. })
        ));
    }

    #[test]
    fn fill_rect_clips_at_edges() {
        let mut map = TileMap::new(4, 3, TileKind::Grass).unwrap();
        let written = map.fill_rect(2, 1, 5, 5, TileKind::Water);
        assert_eq!(written, 4);
        assert_eq!(map.count(TileKind::Water), 4);
        assert_eq!(map.tile_kind_at(3, 2), Some(TileKind::Water));
        assert_eq!(map.tile_kind_at(1, 1), Some(TileKind::Grass));
    }

    #[test]
    fn render_puts_top_row_first() {
        let mut map = TileMap::new(3, 2, TileKind::Grass).unwrap();
        let _ = map.set_tile(0, 1, TileKind::Wall);
        assert_eq!(map.render_ascii(), "#..\n...\n");
    }

    #[test]
    fn layout_summary_lists_feature_bounds() {
        let mut map = TileMap::new(6, 6, TileKind::Grass).unwrap();
        map.fill_rect(0, 2, 6, 2, TileKind::Water);
        let summary = map.layout_summary().unwrap_or_default();
        assert!(summary.starts_with("Grid of size 6x6 covered in grass."));
        assert!(summary.contains("water spans x 0-5, y 2-3"));
    }
}
