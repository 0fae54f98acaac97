//! Mid-match tactical adjustments.
//!
//! The coaching collaborator requests an adjustment; the engine resolves
//! it against a success probability driven by adjustment complexity and
//! situational pressure (close scoreboard late in the match is hard to
//! coach through). Success applies the new parameters after a nonzero
//! player-adaptation delay; failure leaves the plan untouched and costs a
//! temporary disruption penalty. Requests inside the per-coach cooldown
//! are rejected outright, never queued.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::{DefensiveStyle, Formation, OffensiveStyle, TacticalGamePlan};
use crate::engine::config::MatchTuning;
use crate::engine::phase::Phase;

/// A coaching request to change the live game plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalAdjustment {
    FormationChange(Formation),
    PressureIntensity(f32),
    OffensiveStyleChange(OffensiveStyle),
    DefensiveStyleChange(DefensiveStyle),
    /// Reset positional structure without changing named parameters.
    StructureChange,
}

impl TacticalAdjustment {
    /// How hard the adjustment is to execute, 0.0-1.0. Wholesale
    /// formation changes are the riskiest; nudging pressure is cheap.
    pub fn complexity(&self) -> f32 {
        match self {
            TacticalAdjustment::FormationChange(_) => 1.0,
            TacticalAdjustment::StructureChange => 0.7,
            TacticalAdjustment::DefensiveStyleChange(_) => 0.5,
            TacticalAdjustment::OffensiveStyleChange(_) => 0.5,
            TacticalAdjustment::PressureIntensity(_) => 0.2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TacticalAdjustment::FormationChange(_) => "formation_change",
            TacticalAdjustment::PressureIntensity(_) => "pressure_intensity",
            TacticalAdjustment::OffensiveStyleChange(_) => "offensive_style",
            TacticalAdjustment::DefensiveStyleChange(_) => "defensive_style",
            TacticalAdjustment::StructureChange => "structure_change",
        }
    }
}

/// Resolution of one adjustment request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustmentOutcome {
    /// Players will carry out the change once the adaptation delay runs.
    Applied { effect_magnitude: f32, adaptation_delay: f32 },
    /// The change did not take; the group is briefly disrupted instead.
    Failed { disruption: f32 },
    /// Requested inside the coach's cooldown window.
    Rejected { cooldown_remaining: f32 },
}

/// Live tactical state for one team: the active plan plus any pending
/// change, disruption window, and coach cooldown.
#[derive(Debug, Clone)]
pub struct PlanState {
    plan: TacticalGamePlan,
    /// Change accepted but not yet reflected in ratings.
    pending: Option<PendingChange>,
    disruption: f32,
    disruption_remaining: f32,
    cooldown_remaining: f32,
    pub attempts: u16,
    pub applied: u16,
}

#[derive(Debug, Clone)]
struct PendingChange {
    plan: TacticalGamePlan,
    delay_remaining: f32,
}

/// Seconds of disruption after a failed adjustment.
const DISRUPTION_WINDOW_SECONDS: f32 = 60.0;

impl PlanState {
    pub fn new(mut plan: TacticalGamePlan) -> Self {
        plan.sanitize();
        Self {
            plan,
            pending: None,
            disruption: 0.0,
            disruption_remaining: 0.0,
            cooldown_remaining: 0.0,
            attempts: 0,
            applied: 0,
        }
    }

    /// The plan ratings currently see. A successfully adjusted plan only
    /// shows up here once the adaptation delay has elapsed.
    pub fn effective_plan(&self) -> &TacticalGamePlan {
        &self.plan
    }

    /// Per-player rating modifier from the current tactical state:
    /// formation positioning bonus minus any active disruption.
    pub fn positioning_modifier(&self, phase: Phase) -> f32 {
        let disruption = if self.disruption_remaining > 0.0 { self.disruption } else { 0.0 };
        (self.plan.formation.positional_bonus(phase) - disruption).clamp(-0.2, 0.2)
    }

    /// Advance adaptation, disruption, and cooldown timers by `dt` game
    /// seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        if self.disruption_remaining > 0.0 {
            self.disruption_remaining = (self.disruption_remaining - dt).max(0.0);
            if self.disruption_remaining == 0.0 {
                self.disruption = 0.0;
            }
        }
        if let Some(pending) = &mut self.pending {
            pending.delay_remaining -= dt;
            if pending.delay_remaining <= 0.0 {
                self.plan = pending.plan;
                self.pending = None;
            }
        }
    }

    /// Resolve an adjustment request.
    ///
    /// `score_diff` is this team's score minus the opponent's;
    /// `time_remaining_frac` is the fraction of total match time left.
    pub fn request(
        &mut self,
        adjustment: TacticalAdjustment,
        score_diff: i32,
        time_remaining_frac: f32,
        tuning: &MatchTuning,
        rng: &mut ChaCha8Rng,
    ) -> AdjustmentOutcome {
        if self.cooldown_remaining > 0.0 {
            return AdjustmentOutcome::Rejected { cooldown_remaining: self.cooldown_remaining };
        }
        self.attempts += 1;
        self.cooldown_remaining = tuning.adjustment_cooldown_seconds;

        let complexity = adjustment.complexity();
        let pressure = situational_pressure(score_diff, time_remaining_frac);
        let success_prob = (0.85 - 0.35 * complexity - 0.25 * pressure).clamp(0.05, 0.95);

        if rng.gen::<f32>() < success_prob {
            let mut next = self.plan;
            match adjustment {
                TacticalAdjustment::FormationChange(formation) => next.formation = formation,
                TacticalAdjustment::PressureIntensity(pressure) => next.pressure = pressure,
                TacticalAdjustment::OffensiveStyleChange(style) => next.offensive_style = style,
                TacticalAdjustment::DefensiveStyleChange(style) => next.defensive_style = style,
                TacticalAdjustment::StructureChange => {}
            }
            next.sanitize();

            let effect_magnitude = 0.04 + 0.08 * complexity;
            // Players always need time to carry a change out on the field.
            let adaptation_delay = 30.0 + 90.0 * complexity;
            self.pending = Some(PendingChange { plan: next, delay_remaining: adaptation_delay });
            self.applied += 1;
            AdjustmentOutcome::Applied { effect_magnitude, adaptation_delay }
        } else {
            let disruption = 0.03 + 0.05 * complexity;
            self.disruption = disruption;
            self.disruption_remaining = DISRUPTION_WINDOW_SECONDS;
            AdjustmentOutcome::Failed { disruption }
        }
    }
}

/// Situational pressure in 0.0-1.0: highest when the margin is tight and
/// little time remains.
fn situational_pressure(score_diff: i32, time_remaining_frac: f32) -> f32 {
    let closeness = 1.0 / (1.0 + (score_diff.abs() as f32) / 12.0);
    let lateness = 1.0 - time_remaining_frac.clamp(0.0, 1.0);
    (closeness * lateness).clamp(0.0, 1.0)
}
