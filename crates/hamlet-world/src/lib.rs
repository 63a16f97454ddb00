//! Tile grid, world queries, and the starting town map for the Hamlet simulation.
//!
//! The simulation core never owns terrain: it asks a [`WorldView`] for
//! bounds, walkability, and tile kinds. [`TileMap`] is the in-memory grid
//! implementation and [`create_town_map`] builds the default village.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid construction and edits.
//! - [`view`] -- The [`WorldView`] query trait and layout description helper.
//! - [`tile_map`] -- Row-major tile grid with fill helpers and ASCII rendering.
//! - [`starting_world`] -- The 48x27 riverside town.

pub mod error;
pub mod starting_world;
pub mod tile_map;
pub mod view;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use starting_world::{TOWN_HEIGHT, TOWN_WIDTH, create_town_map};
pub use tile_map::TileMap;
pub use view::{WorldView, describe_layout};
