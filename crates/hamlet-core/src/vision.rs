//! Per-agent visible-entity snapshots.
//!
//! An agent sees every tile within Chebyshev distance `vision_radius` of
//! its position, clipped to the world. Tiles of the default kind are
//! omitted. Other agents inside the same box are listed with their last
//! committed speech.

use hamlet_types::{Position, VisibleAgent, VisibleEntities, VisibleTile};
use hamlet_world::WorldView;

use crate::agent::Agent;

/// Build the snapshot seen by `agents[viewer]`.
///
/// Tiles are listed row by row in ascending `y`, then `x`. Returns an
/// empty snapshot if `viewer` is out of range.
pub fn visible_entities(world: &dyn WorldView, agents: &[Agent], viewer: usize) -> VisibleEntities {
    let Some(me) = agents.get(viewer) else {
        return VisibleEntities::default();
    };
    let radius = i64::from(me.vision_radius);
    let origin = me.position;

    let x_range = clipped(i64::from(origin.x), radius, world.width());
    let y_range = clipped(i64::from(origin.y), radius, world.height());
    let default_kind = world.default_tile();

    let mut tiles = Vec::new();
    if let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (x_range, y_range) {
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                match world.tile_kind_at(x, y) {
                    Some(kind) if kind != default_kind => tiles.push(VisibleTile {
                        position: Position::new(x, y),
                        kind,
                    }),
                    _ => {}
                }
            }
        }
    }

    let agents = agents
        .iter()
        .enumerate()
        .filter(|(idx, other)| {
            *idx != viewer
                && i64::from(origin.chebyshev_distance(other.position)) <= radius
        })
        .map(|(_, other)| VisibleAgent {
            name: other.name.clone(),
            position: other.position,
            speech: other.speech.clone(),
        })
        .collect();

    VisibleEntities { tiles, agents }
}

/// Inclusive `[center - radius, center + radius]` clipped to `0..extent`.
fn clipped(center: i64, radius: i64, extent: u32) -> Option<(i32, i32)> {
    let max = i64::from(extent).checked_sub(1)?;
    let lo = center.saturating_sub(radius).max(0);
    let hi = center.saturating_add(radius).min(max);
    if lo > hi {
        return None;
    }
    Some((i32::try_from(lo).ok()?, i32::try_from(hi).ok()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hamlet_types::TileKind;
    use hamlet_world::TileMap;

    use super::*;
    use crate::config::AgentSeed;

    fn agent(name: &str, x: i32, y: i32, radius: u32) -> Agent {
        let mut seed = AgentSeed::new(name, "Villager", 30, "Calm", x, y);
        seed.vision_radius = radius;
        Agent::from_seed(&seed)
    }

    fn world() -> TileMap {
        let mut map = TileMap::new(10, 10, TileKind::Grass).unwrap();
        map.set_tile(1, 1, TileKind::Water).unwrap();
        map.set_tile(4, 4, TileKind::TreeOak).unwrap();
        map.set_tile(9, 9, TileKind::Bush).unwrap();
        map
    }

    #[test]
    fn box_excludes_default_tiles_and_far_features() {
        let agents = vec![agent("Ada", 2, 2, 2)];
        let seen = visible_entities(&world(), &agents, 0);
        let positions: Vec<Position> = seen.tiles.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![Position::new(1, 1), Position::new(4, 4)]);
        assert!(seen.tiles.iter().all(|t| t.kind != TileKind::Grass));
    }

    #[test]
    fn box_is_clipped_at_edges() {
        let agents = vec![agent("Ada", 9, 9, 3)];
        let seen = visible_entities(&world(), &agents, 0);
        assert_eq!(seen.tiles.len(), 1);
        assert_eq!(seen.tiles.first().unwrap().kind, TileKind::Bush);
    }

    #[test]
    fn nearby_agents_carry_speech() {
        let mut agents = vec![agent("Ada", 2, 2, 2), agent("Gus", 4, 3, 2), agent("Finn", 8, 8, 2)];
        agents.get_mut(1).unwrap().speech = "Nice day.".to_owned();
        let seen = visible_entities(&world(), &agents, 0);
        assert_eq!(seen.agents.len(), 1);
        let gus = seen.agents.first().unwrap();
        assert_eq!(gus.name, "Gus");
        assert_eq!(gus.speech, "Nice day.");
    }

    #[test]
    fn huge_radius_does_not_overflow() {
        let agents = vec![agent("Ada", 0, 0, u32::MAX)];
        let seen = visible_entities(&world(), &agents, 0);
        assert_eq!(seen.tiles.len(), 3);
    }

    #[test]
    fn unknown_viewer_sees_nothing() {
        let seen = visible_entities(&world(), &[], 0);
        assert!(seen.tiles.is_empty());
        assert!(seen.agents.is_empty());
    }
}
