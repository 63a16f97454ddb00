//! Simulated clock, agent state, and the concurrent step orchestrator for
//! the Hamlet simulation.
//!
//! Each step runs through five phases: Advance Clock, Refresh Daily Plans,
//! Dispatch Micro Plans, Apply Results, and Age Directives. Planning
//! requests fan out to the [`PlanningOracle`] concurrently; every state
//! mutation happens afterwards on the calling task, in roster order.
//!
//! # Modules
//!
//! - [`agent`] -- Agent records, relationship scores, and roster seeding.
//! - [`clock`] -- Simulated wall clock with a fixed step.
//! - [`config`] -- Configuration loading from `hamlet-config.yaml`.
//! - [`directive`] -- Operator directives with a time-to-live.
//! - [`message_log`] -- Bounded log of speech and operator events.
//! - [`movement`] -- Move candidates, legality, and illegal-move feedback.
//! - [`oracle`] -- The [`PlanningOracle`] trait and [`StubOracle`].
//! - [`operator`] -- Shared runtime control state (pause, speed, stop).
//! - [`parse`] -- Oracle output normalization and plan parsing.
//! - [`runner`] -- The bounded simulation loop.
//! - [`simulation`] -- The [`Simulation`] context owned by the caller.
//! - [`social`] -- Relationship updates driven by speech.
//! - [`step`] -- One orchestrated step.
//! - [`vision`] -- Per-agent visible-entity snapshots.
//!
//! [`PlanningOracle`]: oracle::PlanningOracle
//! [`StubOracle`]: oracle::StubOracle
//! [`Simulation`]: simulation::Simulation

pub mod agent;
pub mod clock;
pub mod config;
pub mod directive;
pub mod message_log;
pub mod movement;
pub mod operator;
pub mod oracle;
pub mod parse;
pub mod runner;
pub mod simulation;
pub mod social;
pub mod step;
pub mod vision;
