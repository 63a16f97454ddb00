//! Oracle output normalization and plan parsing.
//!
//! Oracles frequently wrap their JSON in a Markdown code fence. The text
//! is trimmed and, if it both starts and ends with a triple backtick, the
//! fence and an optional `json` language tag are stripped. What remains
//! must be a JSON object.

use hamlet_types::{DailyPlan, MicroPlan};
use serde_json::Value;

/// Errors that can occur while parsing oracle output.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Nothing left after stripping whitespace and fences.
    #[error("oracle output is empty")]
    Empty,

    /// The text is not valid JSON.
    #[error("oracle output is not valid JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Valid JSON, but not an object.
    #[error("oracle output is not a JSON object")]
    NotAnObject,
}

/// A parsed micro plan together with the cleaned text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMicroPlan {
    /// The structured plan.
    pub plan: MicroPlan,
    /// The normalized oracle text, stored as the previous action plan.
    pub cleaned: String,
}

/// Strip surrounding whitespace and an optional Markdown code fence.
pub fn normalize_output(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```")) {
        return trimmed;
    }
    let inner = trimmed.trim_matches('`');
    let untagged = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => inner.get(4..).unwrap_or_default(),
        _ => inner,
    };
    untagged.trim()
}

/// Parse the output of a micro-planning call.
///
/// `direction` and `speech` are read when they are strings and treated as
/// absent otherwise; a `goalxy` that is not a pair of integers is ignored.
///
/// # Errors
///
/// Returns [`ParseError`] if the normalized text is empty, not JSON, or
/// not an object.
pub fn parse_micro_plan(raw: &str) -> Result<ParsedMicroPlan, ParseError> {
    let cleaned = normalize_output(raw);
    let object = parse_object(cleaned)?;

    let text_field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);
    let plan = MicroPlan {
        direction: text_field("direction"),
        speech: text_field("speech"),
        goalxy: object
            .get("goalxy")
            .and_then(|v| serde_json::from_value(v.clone()).ok()),
    };

    Ok(ParsedMicroPlan {
        plan,
        cleaned: cleaned.to_owned(),
    })
}

/// Parse the output of a daily-planning call.
///
/// A missing or non-string `daily_plan` yields an empty plan, which the
/// caller treats as "not yet planned".
///
/// # Errors
///
/// Returns [`ParseError`] if the normalized text is empty, not JSON, or
/// not an object.
pub fn parse_daily_plan(raw: &str) -> Result<DailyPlan, ParseError> {
    let object = parse_object(normalize_output(raw))?;
    let daily_plan = object
        .get("daily_plan")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_owned())
        .unwrap_or_default();
    Ok(DailyPlan { daily_plan })
}

fn parse_object(cleaned: &str) -> Result<serde_json::Map<String, Value>, ParseError> {
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }
    match serde_json::from_str::<Value>(cleaned)? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}
