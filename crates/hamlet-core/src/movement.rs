//! Move candidates, legality, and illegal-move feedback.
//!
//! A move is legal only if the direction word names one of the four
//! cardinal directions and the candidate cell is inside the world and
//! walkable. Illegal moves never change position; the agent instead gets
//! a feedback message as its previous action plan.

use hamlet_types::{Direction, Position};
use hamlet_world::WorldView;

/// Result of evaluating a requested move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The agent may step to `to`.
    Moved {
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
        /// The direction taken.
        direction: Direction,
    },

    /// The move was refused.
    Rejected {
        /// Human-readable feedback for the agent's next plan.
        feedback: String,
    },
}

/// Evaluate a raw direction word requested by an agent at `from`.
///
/// `None`, empty, or unrecognised words are rejected without moving.
pub fn evaluate_move(world: &dyn WorldView, from: Position, raw: Option<&str>) -> MoveOutcome {
    let word = raw.map(str::trim).unwrap_or_default();
    let Some(direction) = Direction::parse(word) else {
        let shown = if word.is_empty() { "none" } else { word };
        return MoveOutcome::Rejected {
            feedback: illegal_move_feedback(shown, from, from, "no valid direction was given"),
        };
    };

    let Some(to) = from.step(direction) else {
        return MoveOutcome::Rejected {
            feedback: illegal_move_feedback(direction.as_str(), from, from, "out of bounds"),
        };
    };

    if !world.in_bounds(to.x, to.y) {
        return MoveOutcome::Rejected {
            feedback: illegal_move_feedback(direction.as_str(), from, to, "out of bounds"),
        };
    }
    if !world.is_walkable(to.x, to.y) {
        let reason = world.tile_kind_at(to.x, to.y).map_or_else(
            || "tile is not walkable".to_owned(),
            |kind| format!("{kind} is not walkable"),
        );
        return MoveOutcome::Rejected {
            feedback: illegal_move_feedback(direction.as_str(), from, to, &reason),
        };
    }

    MoveOutcome::Moved {
        from,
        to,
        direction,
    }
}

/// Feedback text recorded as the previous action plan after an illegal move.
pub fn illegal_move_feedback(
    direction: &str,
    from: Position,
    candidate: Position,
    reason: &str,
) -> String {
    format!(
        "ILLEGAL MOVE: Attempted to move {direction} from {from} to {candidate} ({reason}). \
         Please follow the rules: stay inside the map and only walk on walkable tiles. \
         Previous position was {from}."
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unreachable)]
mod tests {
    use hamlet_types::TileKind;
    use hamlet_world::TileMap;

    use super::*;

    fn world() -> TileMap {
        let mut map = TileMap::new(5, 5, TileKind::Grass).unwrap();
        map.set_tile(2, 3, TileKind::Water).unwrap();
        map
    }

    #[test]
    fn directions_follow_y_up_convention() {
        let w = world();
        let cases = [
            ("up", Position::new(1, 2)),
            ("down", Position::new(1, 0)),
            ("left", Position::new(0, 1)),
            ("right", Position::new(2, 1)),
        ];
        for (word, expected) in cases {
            assert_eq!(
                evaluate_move(&w, Position::new(1, 1), Some(word)),
                MoveOutcome::Moved {
                    from: Position::new(1, 1),
                    to: expected,
                    direction: Direction::parse(word).unwrap(),
                }
            );
        }
    }

    #[test]
    fn off_map_move_is_rejected_with_feedback() {
        let outcome = evaluate_move(&world(), Position::new(0, 0), Some("left"));
        let MoveOutcome::Rejected { feedback } = outcome else {
            unreachable!("left from the corner must be illegal");
        };
        assert!(feedback.starts_with("ILLEGAL MOVE"));
        assert!(feedback.contains("left"));
        assert!(feedback.contains("(0, 0)"));
        assert!(feedback.contains("(-1, 0)"));
    }

    #[test]
    fn non_walkable_target_is_rejected() {
        let outcome = evaluate_move(&world(), Position::new(2, 2), Some("up"));
        let MoveOutcome::Rejected { feedback } = outcome else {
            unreachable!("water is not walkable");
        };
        assert!(feedback.contains("water"));
    }

    /// World whose walkability is decided apart from its tile kinds.
    struct Fenced;

    impl WorldView for Fenced {
        fn width(&self) -> u32 {
            5
        }
        fn height(&self) -> u32 {
            5
        }
        fn tile_kind_at(&self, x: i32, y: i32) -> Option<TileKind> {
            self.in_bounds(x, y).then_some(TileKind::Grass)
        }
        fn is_walkable(&self, x: i32, y: i32) -> bool {
            self.in_bounds(x, y) && (x, y) != (2, 3)
        }
    }

    /// World that reports tiles past its declared edge.
    struct Overhanging;

    impl WorldView for Overhanging {
        fn width(&self) -> u32 {
            3
        }
        fn height(&self) -> u32 {
            3
        }
        fn tile_kind_at(&self, _x: i32, _y: i32) -> Option<TileKind> {
            Some(TileKind::Grass)
        }
    }

    #[test]
    fn world_walkability_override_is_honoured() {
        let outcome = evaluate_move(&Fenced, Position::new(2, 2), Some("up"));
        let MoveOutcome::Rejected { feedback } = outcome else {
            unreachable!("(2, 3) is fenced off");
        };
        assert!(feedback.contains("(2, 3)"));
        assert!(feedback.contains("grass is not walkable"));

        assert!(matches!(
            evaluate_move(&Fenced, Position::new(2, 2), Some("right")),
            MoveOutcome::Moved { .. }
        ));
    }

    #[test]
    fn declared_bounds_win_over_tile_lookup() {
        let outcome = evaluate_move(&Overhanging, Position::new(2, 1), Some("right"));
        let MoveOutcome::Rejected { feedback } = outcome else {
            unreachable!("x = 3 is past the declared width");
        };
        assert!(feedback.contains("out of bounds"));
    }

    #[test]
    fn unknown_or_missing_direction_is_rejected() {
        let w = world();
        let from = Position::new(2, 2);
        for raw in [None, Some(""), Some("north"), Some("upward")] {
            assert!(matches!(
                evaluate_move(&w, from, raw),
                MoveOutcome::Rejected { .. }
            ));
        }
        let MoveOutcome::Rejected { feedback } = evaluate_move(&w, from, None) else {
            unreachable!("missing direction must be illegal");
        };
        assert!(feedback.contains("move none"));
    }

    #[test]
    fn direction_word_is_case_insensitive() {
        assert!(matches!(
            evaluate_move(&world(), Position::new(2, 2), Some(" Right ")),
            MoveOutcome::Moved { direction: Direction::Right, .. }
        ));
    }
}
