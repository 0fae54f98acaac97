//! Injury model.
//!
//! Per tick, each on-field uninjured player faces a risk draw:
//! `risk = base_per_minute x phase_mult x fatigue_scale x durability_scale`
//! scaled to the tick length. The per-team injury cap is checked before
//! any draw — a capped team consumes no randomness and can never exceed
//! the cap. An injured player is out for the remainder of the match and
//! adds a severity-dependent fixed time-on contribution to the clock.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::config::MatchTuning;
use super::context::TeamState;
use super::phase::Phase;

/// How bad it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjurySeverity {
    /// Sore but notable; listed for completeness of the report.
    Niggle,
    Minor,
    Moderate,
    Severe,
}

impl InjurySeverity {
    /// Fixed time-on contribution while the player is attended to.
    pub fn time_on_seconds(&self) -> f32 {
        match self {
            InjurySeverity::Niggle => 20.0,
            InjurySeverity::Minor => 45.0,
            InjurySeverity::Moderate => 75.0,
            InjurySeverity::Severe => 120.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InjurySeverity::Niggle => "niggle",
            InjurySeverity::Minor => "minor",
            InjurySeverity::Moderate => "moderate",
            InjurySeverity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Shoulder,
    Ribs,
    Hamstring,
    Quad,
    Calf,
    Knee,
    Ankle,
    Foot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryType {
    Concussion,
    Muscle,
    Ligament,
    Impact,
}

/// A typed injury: what, where, how bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Injury {
    pub injury_type: InjuryType,
    pub body_part: BodyPart,
    pub severity: InjurySeverity,
}

/// One injury resolved during a tick.
#[derive(Debug, Clone, Copy)]
pub struct InjuryOccurrence {
    /// Roster index of the injured player.
    pub player_idx: usize,
    pub player_id: u32,
    pub injury: Injury,
    /// Time-on contribution to pass to the clock.
    pub time_on_seconds: f32,
}

/// Body-part likelihood weights (AFL injury surveillance ordering:
/// hamstrings first, then knees/ankles, head knocks, the rest).
const BODY_PART_WEIGHTS: [(BodyPart, u32); 9] = [
    (BodyPart::Hamstring, 24),
    (BodyPart::Knee, 16),
    (BodyPart::Ankle, 14),
    (BodyPart::Calf, 10),
    (BodyPart::Quad, 9),
    (BodyPart::Shoulder, 9),
    (BodyPart::Head, 8),
    (BodyPart::Ribs, 5),
    (BodyPart::Foot, 5),
];

const SEVERITY_WEIGHTS: [(InjurySeverity, u32); 4] = [
    (InjurySeverity::Niggle, 40),
    (InjurySeverity::Minor, 35),
    (InjurySeverity::Moderate, 20),
    (InjurySeverity::Severe, 5),
];

/// Injury classification follows from where it happened.
fn type_for(body_part: BodyPart) -> InjuryType {
    match body_part {
        BodyPart::Head => InjuryType::Concussion,
        BodyPart::Hamstring | BodyPart::Quad | BodyPart::Calf => InjuryType::Muscle,
        BodyPart::Knee | BodyPart::Ankle => InjuryType::Ligament,
        BodyPart::Shoulder | BodyPart::Ribs | BodyPart::Foot => InjuryType::Impact,
    }
}

fn weighted_draw<T: Copy>(table: &[(T, u32)], rng: &mut ChaCha8Rng) -> T {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut draw = rng.gen_range(0..total);
    for (value, weight) in table {
        if draw < *weight {
            return *value;
        }
        draw -= weight;
    }
    table[table.len() - 1].0
}

/// Sample a typed injury. Head knocks are never niggles; a concussed
/// player is at minimum a minor casualty.
pub fn sample_injury(rng: &mut ChaCha8Rng) -> Injury {
    let body_part = weighted_draw(&BODY_PART_WEIGHTS, rng);
    let mut severity = weighted_draw(&SEVERITY_WEIGHTS, rng);
    if body_part == BodyPart::Head && severity == InjurySeverity::Niggle {
        severity = InjurySeverity::Minor;
    }
    Injury { injury_type: type_for(body_part), body_part, severity }
}

/// Per-player injury risk for a tick of `dt` real seconds.
fn tick_risk(
    fatigue_mult: f32,
    durability_fraction: f32,
    phase: Phase,
    dt: f32,
    tuning: &MatchTuning,
) -> f32 {
    let fatigue_scale = 1.0 + (1.0 - fatigue_mult) * tuning.injury_fatigue_weight;
    let durability_scale = 1.5 - durability_fraction;
    let risk = tuning.injury_base_risk_per_minute * (dt / 60.0)
        * tuning.injury_risk_mult(phase)
        * fatigue_scale
        * durability_scale;
    risk.clamp(0.0, 1.0)
}

/// Roll injuries for one team over a tick. At most one injury resolves
/// per team per tick; the roll sequence stops at the first hit.
///
/// The cap is checked before drawing: a capped team consumes no RNG.
pub fn roll_team(
    team: &mut TeamState,
    phase: Phase,
    dt: f32,
    tuning: &MatchTuning,
    rng: &mut ChaCha8Rng,
) -> Option<InjuryOccurrence> {
    if team.injuries >= tuning.max_injuries_per_team {
        return None;
    }

    for idx in 0..team.runtime.len() {
        let rt = &team.runtime[idx];
        if !rt.on_field || rt.injury.is_some() {
            continue;
        }
        let risk = tick_risk(
            rt.fatigue_mult,
            team.roster[idx].attributes.durability_fraction(),
            phase,
            dt,
            tuning,
        );
        if rng.gen::<f32>() < risk {
            let injury = sample_injury(rng);
            let rt = &mut team.runtime[idx];
            rt.injury = Some(injury);
            rt.on_field = false;
            team.injuries += 1;
            log::debug!(
                "injury: {} ({}) {} {:?} {:?}",
                team.roster[idx].name,
                team.name,
                injury.severity.label(),
                injury.injury_type,
                injury.body_part,
            );
            return Some(InjuryOccurrence {
                player_idx: idx,
                player_id: team.roster[idx].id,
                injury,
                time_on_seconds: injury.severity.time_on_seconds() * tuning.injury_time_on_scale,
            });
        }
    }
    None
}
