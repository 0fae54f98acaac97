//! Match-scoped mutable state.
//!
//! [`MatchContext`] is the single aggregate owning everything that changes
//! during one match — both teams' runtime state, the clock, the phase, the
//! seeded generator, the event buffer. It is owned exclusively by the
//! orchestrator and consumed into a result at match end; nothing here
//! lives in a global or is shared across matches.

use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::config::MatchTuning;
use super::events::{MatchEvent, MatchTelemetry};
use super::injury::Injury;
use super::phase::Phase;
use super::timing::TimingState;
use crate::models::{Player, Team, ON_FIELD_COUNT};
use crate::tactics::{PlanState, TacticalGamePlan};

/// Home or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// AFL score line: goals are worth six points, behinds one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub goals: u16,
    pub behinds: u16,
}

impl Score {
    pub fn points(&self) -> u16 {
        self.goals * 6 + self.behinds
    }
}

/// A player's per-match mutable state. Mutated only by the fatigue and
/// injury models, plus the orchestrator's rotation bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRuntime {
    pub seconds_played: f32,
    pub seconds_since_rotation: f32,
    /// 0-100; drains on field, recovers on the bench.
    pub condition: f32,
    /// 0.6-1.0; recomputed from condition each tick.
    pub fatigue_mult: f32,
    pub on_field: bool,
    /// Set once; an injured player is out for the rest of the match.
    pub injury: Option<Injury>,
}

impl PlayerRuntime {
    fn fresh(on_field: bool) -> Self {
        Self {
            seconds_played: 0.0,
            seconds_since_rotation: 0.0,
            condition: 100.0,
            fatigue_mult: 1.0,
            on_field,
            injury: None,
        }
    }
}

/// One team's full match state: immutable roster plus parallel runtime
/// entries, score, tactical plan state, and resource counters.
#[derive(Debug, Clone)]
pub struct TeamState {
    pub name: String,
    pub roster: Vec<Player>,
    /// Parallel to `roster`.
    pub runtime: Vec<PlayerRuntime>,
    pub score: Score,
    pub plan: PlanState,
    pub injuries: u8,
    pub interchanges: u16,
}

impl TeamState {
    /// Build match state from a roster. The first [`ON_FIELD_COUNT`]
    /// players in selection order start on the field, the rest on the
    /// interchange bench.
    pub fn new(team: Team, plan: TacticalGamePlan) -> Self {
        let runtime = (0..team.players.len())
            .map(|i| PlayerRuntime::fresh(i < ON_FIELD_COUNT))
            .collect();
        Self {
            name: team.name,
            roster: team.players,
            runtime,
            score: Score::default(),
            plan: PlanState::new(plan),
            injuries: 0,
            interchanges: 0,
        }
    }

    pub fn on_field_count(&self) -> usize {
        self.runtime.iter().filter(|rt| rt.on_field).count()
    }

    /// Mean condition across the whole roster.
    pub fn average_condition(&self) -> f32 {
        if self.runtime.is_empty() {
            return 0.0;
        }
        let total: f32 = self.runtime.iter().map(|rt| rt.condition).sum();
        total / self.runtime.len() as f32
    }

    /// Freshest uninjured bench player, if any.
    pub fn best_bench_player(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, rt) in self.runtime.iter().enumerate() {
            if rt.on_field || rt.injury.is_some() {
                continue;
            }
            match best {
                Some(b) if self.runtime[b].condition >= rt.condition => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

/// Everything mutable about one match, owned by the orchestrator.
pub struct MatchContext {
    pub home: TeamState,
    pub away: TeamState,
    pub phase: Phase,
    /// Side in possession for the current phase.
    pub possession: Side,
    pub timing: TimingState,
    /// The single injected generator; all randomness flows through here.
    pub rng: ChaCha8Rng,
    pub events: Vec<MatchEvent>,
    pub telemetry: MatchTelemetry,
}

impl MatchContext {
    pub fn new(
        home: TeamState,
        away: TeamState,
        rng: ChaCha8Rng,
        tuning: &MatchTuning,
    ) -> Self {
        Self {
            home,
            away,
            phase: Phase::CenterBounce,
            possession: Side::Home,
            timing: TimingState::new(tuning),
            rng,
            events: Vec::with_capacity(512),
            telemetry: MatchTelemetry::default(),
        }
    }

    pub fn team(&self, side: Side) -> &TeamState {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut TeamState {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// Split borrow of one team's state and the generator, for callers
    /// that need both mutably.
    pub fn team_and_rng_mut(&mut self, side: Side) -> (&mut TeamState, &mut ChaCha8Rng) {
        match side {
            Side::Home => (&mut self.home, &mut self.rng),
            Side::Away => (&mut self.away, &mut self.rng),
        }
    }

    /// This side's points minus the opponent's.
    pub fn score_diff(&self, side: Side) -> i32 {
        let own = i32::from(self.team(side).score.points());
        let other = i32::from(self.team(side.opponent()).score.points());
        own - other
    }
}
