//! Ball-context phases and the fixed transition graph.
//!
//! Every phase transition the resolver emits must be an edge of
//! [`successors`]. Quarter starts force [`Phase::CenterBounce`] outside
//! the graph; nothing else does. The graph deliberately has no edge back
//! into `CenterBounce` — goal restarts flow through the
//! `ShotOnGoal -> OpenPlay` edge with possession handed to the conceding
//! side.

use serde::{Deserialize, Serialize};

/// Discrete ball-context state for one resolver tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    CenterBounce,
    Stoppage,
    OpenPlay,
    Inside50,
    ShotOnGoal,
    KickIn,
}

/// All phases, in a fixed order usable as a table index.
pub const PHASES: [Phase; 6] = [
    Phase::CenterBounce,
    Phase::Stoppage,
    Phase::OpenPlay,
    Phase::Inside50,
    Phase::ShotOnGoal,
    Phase::KickIn,
];

/// Legal outgoing edges per phase, indexed by [`Phase::index`].
const TRANSITIONS: [&[Phase]; 6] = [
    // CenterBounce
    &[Phase::Stoppage, Phase::OpenPlay],
    // Stoppage
    &[Phase::OpenPlay],
    // OpenPlay
    &[Phase::Inside50, Phase::Stoppage],
    // Inside50
    &[Phase::ShotOnGoal, Phase::Stoppage, Phase::KickIn],
    // ShotOnGoal
    &[Phase::KickIn, Phase::OpenPlay],
    // KickIn
    &[Phase::OpenPlay],
];

impl Phase {
    /// Stable table index for this phase.
    pub fn index(&self) -> usize {
        match self {
            Phase::CenterBounce => 0,
            Phase::Stoppage => 1,
            Phase::OpenPlay => 2,
            Phase::Inside50 => 3,
            Phase::ShotOnGoal => 4,
            Phase::KickIn => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::CenterBounce => "center_bounce",
            Phase::Stoppage => "stoppage",
            Phase::OpenPlay => "open_play",
            Phase::Inside50 => "inside_50",
            Phase::ShotOnGoal => "shot_on_goal",
            Phase::KickIn => "kick_in",
        }
    }
}

/// Legal successor phases of `from`.
pub fn successors(from: Phase) -> &'static [Phase] {
    TRANSITIONS[from.index()]
}

/// Whether `from -> to` is an edge of the fixed transition graph.
pub fn is_legal_transition(from: Phase, to: Phase) -> bool {
    successors(from).contains(&to)
}
