//! Operator directives.
//!
//! A directive is free text shown to every agent's micro-planning context
//! while its time-to-live is positive. It is visible in the step it was
//! added and the following one, then expires.

use serde::Serialize;

use crate::message_log::MessageLog;

/// Steps a new directive stays active.
pub const DEFAULT_DIRECTIVE_TTL: u32 = 2;

/// Speaker name recorded in the message log for directives.
pub const OPERATOR_SPEAKER: &str = "Operator";

/// One active directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    /// The instruction text.
    pub text: String,
    /// Remaining steps, always positive while queued.
    pub ttl: u32,
}

/// Ordered set of active directives.
#[derive(Debug, Clone, Default)]
pub struct DirectiveQueue {
    directives: Vec<Directive>,
}

impl DirectiveQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            directives: Vec::new(),
        }
    }

    /// Queue `text` with the default TTL and record it in `log` as spoken
    /// by the operator. Blank text is ignored; returns whether it was added.
    pub fn add(&mut self, text: &str, log: &mut MessageLog) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.directives.push(Directive {
            text: text.to_owned(),
            ttl: DEFAULT_DIRECTIVE_TTL,
        });
        log.push(Some(OPERATOR_SPEAKER), text);
        true
    }

    /// Texts of all active directives, oldest first.
    pub fn active_texts(&self) -> Vec<String> {
        self.directives.iter().map(|d| d.text.clone()).collect()
    }

    /// Decrement every TTL and drop those that reached zero.
    /// Returns the number that expired.
    pub fn age(&mut self) -> usize {
        for directive in &mut self.directives {
            directive.ttl = directive.ttl.saturating_sub(1);
        }
        let before = self.directives.len();
        self.directives.retain(|d| d.ttl > 0);
        before.saturating_sub(self.directives.len())
    }

    /// Active directives, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    /// Number of active directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Whether no directives are active.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_lives_for_two_agings() {
        let mut log = MessageLog::new(10);
        let mut queue = DirectiveQueue::new();
        assert!(queue.add("Everyone gather at the store.", &mut log));

        assert_eq!(queue.active_texts(), vec!["Everyone gather at the store."]);
        assert_eq!(queue.age(), 0);
        assert_eq!(queue.active_texts(), vec!["Everyone gather at the store."]);
        assert_eq!(queue.age(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn add_records_operator_entry() {
        let mut log = MessageLog::new(10);
        let mut queue = DirectiveQueue::new();
        queue.add("  Go fishing  ", &mut log);
        assert_eq!(log.lines(), vec!["Operator: Go fishing"]);
    }

    #[test]
    fn blank_directive_is_ignored() {
        let mut log = MessageLog::new(10);
        let mut queue = DirectiveQueue::new();
        assert!(!queue.add("   ", &mut log));
        assert!(queue.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn staggered_directives_expire_independently() {
        let mut log = MessageLog::new(10);
        let mut queue = DirectiveQueue::new();
        queue.add("first", &mut log);
        queue.age();
        queue.add("second", &mut log);
        assert_eq!(queue.age(), 1);
        assert_eq!(queue.active_texts(), vec!["second"]);
    }
}
