//! # afl_core - Deterministic AFL Match Simulation Engine
//!
//! This library provides a deterministic Australian rules football match
//! simulation engine with a JSON API for easy integration with front ends.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same result)
//! - Phase-based play resolution over a fixed transition graph
//! - Fatigue, injury, and tactical-adjustment models
//! - JSON API for easy integration

// Loop style over parallel roster/runtime arrays
#![allow(clippy::needless_range_loop)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod tactics;

// Re-export main API surface
pub use api::{simulate_match_json, MatchRequest, MatchResponse};
pub use engine::{MatchEngine, MatchPlan, MatchResult, ScriptedAdjustment, TeamSummary};
pub use error::{EngineError, Result};
