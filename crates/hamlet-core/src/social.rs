//! Relationship updates driven by speech.
//!
//! When an agent commits an utterance, every other agent whose name
//! appears in it (case-insensitive substring match) counts as mentioned.
//! The speaker's score toward each distinct mentioned agent moves by the
//! configured delta once per utterance; the mentioned agent's score toward
//! the speaker is untouched.

use serde::Serialize;

use crate::agent::Agent;

/// One score change produced by a mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipChange {
    /// The speaker whose score changed.
    pub from: String,
    /// The mentioned agent.
    pub to: String,
    /// The score after clamping.
    pub score: i32,
}

/// Indices of agents, other than `speaker`, named in `speech`.
pub fn mentioned_agents(agents: &[Agent], speaker: usize, speech: &str) -> Vec<usize> {
    let haystack = speech.to_lowercase();
    agents
        .iter()
        .enumerate()
        .filter(|(idx, other)| {
            *idx != speaker
                && !other.name.is_empty()
                && haystack.contains(&other.name.to_lowercase())
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Apply mention-driven updates for the speech of `agents[speaker]`.
///
/// Returns the changes in roster order. Does nothing if `speaker` is out
/// of range or the speaker is silent.
pub fn propagate_mentions(
    agents: &mut [Agent],
    speaker: usize,
    delta: i32,
) -> Vec<RelationshipChange> {
    let Some(speech) = agents.get(speaker).map(|a| a.speech.clone()) else {
        return Vec::new();
    };
    if speech.trim().is_empty() {
        return Vec::new();
    }

    let targets: Vec<String> = mentioned_agents(agents, speaker, &speech)
        .into_iter()
        .filter_map(|idx| agents.get(idx).map(|a| a.name.clone()))
        .collect();

    let Some(agent) = agents.get_mut(speaker) else {
        return Vec::new();
    };
    targets
        .into_iter()
        .map(|to| {
            let score = agent.adjust_relationship(&to, delta);
            RelationshipChange {
                from: agent.name.clone(),
                to,
                score,
            }
        })
        .collect()
}
