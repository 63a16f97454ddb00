//! Structured plan payloads returned by the planning oracle.
//!
//! These are the shapes the oracle's JSON output is deserialized into.
//! Unknown keys are ignored so that models echoing extra fields (such as
//! their own name) are still accepted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single-step plan: at most one move and one utterance.
///
/// `direction` is kept as the raw string so that an unrecognised word
/// can be reported back verbatim in illegal-move feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MicroPlan {
    /// Requested move: `up`, `down`, `left`, or `right`.
    #[serde(default)]
    pub direction: Option<String>,
    /// Something the agent says out loud this step.
    #[serde(default)]
    pub speech: Option<String>,
    /// Optional long-range target the agent is heading for.
    #[serde(default)]
    pub goalxy: Option<[i32; 2]>,
}

/// A plan covering one simulated day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailyPlan {
    /// Free-text schedule for the day.
    #[serde(default)]
    pub daily_plan: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micro_plan_fields_are_optional() {
        let plan: MicroPlan = serde_json::from_str("{}").unwrap_or_default();
        assert!(plan.direction.is_none());
        assert!(plan.speech.is_none());
    }

    #[test]
    fn micro_plan_ignores_extra_keys() {
        let raw = r#"{"name": "Ada", "goalxy": [3, 4], "direction": "up", "speech": "Morning!"}"#;
        let plan: Result<MicroPlan, _> = serde_json::from_str(raw);
        assert!(plan.is_ok());
        let plan = plan.unwrap_or_default();
        assert_eq!(plan.direction.as_deref(), Some("up"));
        assert_eq!(plan.goalxy, Some([3, 4]));
    }

    #[test]
    fn daily_plan_missing_key_defaults_to_empty() {
        let plan: DailyPlan = serde_json::from_str(r#"{"other": 1}"#).unwrap_or_else(|_| DailyPlan {
            daily_plan: String::from("sentinel"),
        });
        assert_eq!(plan.daily_plan, "");
    }
}
