//! Tactical impact layer.
//!
//! A [`TacticalGamePlan`] names a formation (positional split of the 18
//! on-field players plus phase bonuses) and offensive/defensive styles.
//! [`effectiveness`] converts two opposing plans into signed per-phase
//! advantage deltas for the first plan, built from relative
//! defense/mid/forward counts plus a static formation-matchup table.
//! Each delta is clamped to roughly +/-0.15 so tactics bias phase
//! outcomes without dominating player ratings.

pub mod adjustment;

pub use adjustment::{AdjustmentOutcome, PlanState, TacticalAdjustment};

use serde::{Deserialize, Serialize};

use crate::engine::phase::Phase;

/// Largest magnitude any single tactical delta may reach.
pub const MAX_DELTA: f32 = 0.15;

/// Named on-field structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    /// Even 6-6-6 split.
    #[default]
    Standard,
    /// Extra forward, thin defense (5-6-7).
    Attacking,
    /// Extra defender, thin forward line (7-6-5).
    Defensive,
    /// Heavy defensive flood (8-6-4).
    Flood,
    /// Midfield press (5-8-5).
    Press,
}

impl Formation {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "6-6-6" => Some(Formation::Standard),
            "attacking" => Some(Formation::Attacking),
            "defensive" => Some(Formation::Defensive),
            "flood" => Some(Formation::Flood),
            "press" => Some(Formation::Press),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Formation::Standard => "standard",
            Formation::Attacking => "attacking",
            Formation::Defensive => "defensive",
            Formation::Flood => "flood",
            Formation::Press => "press",
        }
    }

    /// (defenders, midfielders, forwards) split of the 18 on-field spots.
    pub fn split(&self) -> (u8, u8, u8) {
        match self {
            Formation::Standard => (6, 6, 6),
            Formation::Attacking => (5, 6, 7),
            Formation::Defensive => (7, 6, 5),
            Formation::Flood => (8, 6, 4),
            Formation::Press => (5, 8, 5),
        }
    }

    fn index(&self) -> usize {
        match self {
            Formation::Standard => 0,
            Formation::Attacking => 1,
            Formation::Defensive => 2,
            Formation::Flood => 3,
            Formation::Press => 4,
        }
    }

    /// Small positional bonus the formation grants in a phase,
    /// independent of the opponent.
    pub fn positional_bonus(&self, phase: Phase) -> f32 {
        match (self, phase) {
            (Formation::Press, Phase::CenterBounce | Phase::Stoppage) => 0.03,
            (Formation::Attacking, Phase::Inside50 | Phase::ShotOnGoal) => 0.03,
            (Formation::Defensive, Phase::KickIn) => 0.02,
            (Formation::Flood, Phase::KickIn) => 0.03,
            (Formation::Flood, Phase::Inside50) => -0.02,
            _ => 0.0,
        }
    }
}

/// Preferred avenue to goal when in possession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffensiveStyle {
    /// Fast movement through the corridor; more entries, more turnovers.
    Corridor,
    /// Safe boundary-side ball movement.
    #[default]
    BoundaryLine,
    /// Chip-and-hold possession game.
    ShortPossession,
}

/// Defensive accountability scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefensiveStyle {
    /// One-on-one accountability.
    #[default]
    Accountable,
    /// Zone off and protect space behind the ball.
    Zoning,
    /// Full-ground press.
    Pressing,
}

/// One team's tactical instructions for the match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticalGamePlan {
    pub formation: Formation,
    pub offensive_style: OffensiveStyle,
    pub defensive_style: DefensiveStyle,
    /// Pressure intensity, 0.0 (conserve) to 1.0 (manic).
    pub pressure: f32,
}

impl Default for TacticalGamePlan {
    fn default() -> Self {
        Self {
            formation: Formation::Standard,
            offensive_style: OffensiveStyle::BoundaryLine,
            defensive_style: DefensiveStyle::Accountable,
            pressure: 0.5,
        }
    }
}

impl TacticalGamePlan {
    /// Clamp caller-supplied parameters into range.
    pub fn sanitize(&mut self) {
        self.pressure = if self.pressure.is_finite() { self.pressure.clamp(0.0, 1.0) } else { 0.5 };
    }
}

/// Signed per-phase advantage of plan A over plan B.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TacticalEffectiveness {
    pub center_bounce: f32,
    pub open_play: f32,
    pub inside50: f32,
    pub kick_in: f32,
    pub overall: f32,
}

impl TacticalEffectiveness {
    /// Delta relevant to a given phase (shots inherit the inside-50
    /// pressure context; stoppages share the center-bounce contest).
    pub fn for_phase(&self, phase: Phase) -> f32 {
        match phase {
            Phase::CenterBounce | Phase::Stoppage => self.center_bounce,
            Phase::OpenPlay => self.open_play,
            Phase::Inside50 | Phase::ShotOnGoal => self.inside50,
            Phase::KickIn => self.kick_in,
        }
    }
}

/// Static formation-matchup table: small edge for row (A) over column (B).
/// Flood blunts Attacking; Press beats Standard around the ball; Attacking
/// punishes Press's thin back line.
const MATCHUP: [[f32; 5]; 5] = [
    //            Std     Atk     Def     Flood   Press
    /* Std   */ [0.000, 0.005, 0.000, -0.005, -0.010],
    /* Atk   */ [0.010, 0.000, -0.010, -0.020, 0.015],
    /* Def   */ [0.000, 0.015, 0.000, 0.000, -0.005],
    /* Flood */ [0.005, 0.020, 0.000, 0.000, -0.010],
    /* Press */ [0.010, -0.015, 0.005, 0.010, 0.000],
];

fn clamp_delta(value: f32) -> f32 {
    value.clamp(-MAX_DELTA, MAX_DELTA)
}

/// Signed advantage deltas of `a` over `b`.
///
/// Pure and symmetric-by-construction for the count terms:
/// `effectiveness(a, b).center_bounce == -effectiveness(b, a).center_bounce`
/// holds whenever the matchup table entries mirror each other.
pub fn effectiveness(a: &TacticalGamePlan, b: &TacticalGamePlan) -> TacticalEffectiveness {
    let (a_def, a_mid, a_fwd) = a.formation.split();
    let (b_def, b_mid, b_fwd) = b.formation.split();

    let mid_delta = f32::from(a_mid) - f32::from(b_mid);
    let fwd_vs_def = f32::from(a_fwd) - f32::from(b_def);
    let def_vs_fwd = f32::from(a_def) - f32::from(b_fwd);
    let pressure_delta = a.pressure - b.pressure;
    let matchup = MATCHUP[a.formation.index()][b.formation.index()];

    let mut center_bounce = mid_delta * 0.015 + pressure_delta * 0.02;
    if a.defensive_style == DefensiveStyle::Pressing {
        center_bounce += 0.01;
    }
    if b.defensive_style == DefensiveStyle::Pressing {
        center_bounce -= 0.01;
    }

    let mut open_play = mid_delta * 0.010 + pressure_delta * 0.03 + matchup;
    if a.offensive_style == OffensiveStyle::ShortPossession {
        open_play += 0.01;
    }
    if b.offensive_style == OffensiveStyle::ShortPossession {
        open_play -= 0.01;
    }

    let mut inside50 = fwd_vs_def * 0.012 + matchup * 0.5;
    if a.offensive_style == OffensiveStyle::Corridor {
        inside50 += 0.015;
    }
    if b.defensive_style == DefensiveStyle::Zoning {
        inside50 -= 0.010;
    }

    let mut kick_in = def_vs_fwd * 0.010;
    if a.defensive_style == DefensiveStyle::Zoning {
        kick_in += 0.010;
    }
    if b.offensive_style == OffensiveStyle::Corridor {
        kick_in -= 0.005;
    }

    center_bounce = clamp_delta(center_bounce + a.formation.positional_bonus(Phase::CenterBounce)
        - b.formation.positional_bonus(Phase::CenterBounce));
    open_play = clamp_delta(open_play + a.formation.positional_bonus(Phase::OpenPlay)
        - b.formation.positional_bonus(Phase::OpenPlay));
    inside50 = clamp_delta(inside50 + a.formation.positional_bonus(Phase::Inside50)
        - b.formation.positional_bonus(Phase::Inside50));
    kick_in = clamp_delta(kick_in + a.formation.positional_bonus(Phase::KickIn)
        - b.formation.positional_bonus(Phase::KickIn));

    let overall = clamp_delta(
        center_bounce * 0.2 + open_play * 0.35 + inside50 * 0.3 + kick_in * 0.15 + matchup * 0.5,
    );

    TacticalEffectiveness { center_bounce, open_play, inside50, kick_in, overall }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(formation: Formation) -> TacticalGamePlan {
        TacticalGamePlan { formation, ..Default::default() }
    }

    #[test]
    fn test_identical_plans_are_neutral() {
        let eff = effectiveness(&plan(Formation::Standard), &plan(Formation::Standard));
        assert_eq!(eff.center_bounce, 0.0);
        assert_eq!(eff.open_play, 0.0);
        assert_eq!(eff.inside50, 0.0);
        assert_eq!(eff.kick_in, 0.0);
        assert_eq!(eff.overall, 0.0);
    }

    #[test]
    fn test_deltas_stay_bounded() {
        let formations = [
            Formation::Standard,
            Formation::Attacking,
            Formation::Defensive,
            Formation::Flood,
            Formation::Press,
        ];
        let offense = [OffensiveStyle::Corridor, OffensiveStyle::BoundaryLine, OffensiveStyle::ShortPossession];
        let defense = [DefensiveStyle::Accountable, DefensiveStyle::Zoning, DefensiveStyle::Pressing];
        for fa in formations {
            for fb in formations {
                for oa in offense {
                    for db in defense {
                        let a = TacticalGamePlan {
                            formation: fa,
                            offensive_style: oa,
                            defensive_style: DefensiveStyle::Pressing,
                            pressure: 1.0,
                        };
                        let b = TacticalGamePlan {
                            formation: fb,
                            offensive_style: OffensiveStyle::Corridor,
                            defensive_style: db,
                            pressure: 0.0,
                        };
                        let eff = effectiveness(&a, &b);
                        for delta in [eff.center_bounce, eff.open_play, eff.inside50, eff.kick_in, eff.overall] {
                            assert!(delta.abs() <= MAX_DELTA + 1e-6, "delta {} out of range", delta);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_attacking_gains_inside50_over_standard() {
        let eff = effectiveness(&plan(Formation::Attacking), &plan(Formation::Standard));
        assert!(eff.inside50 > 0.0);
    }

    #[test]
    fn test_flood_concedes_fewer_entries() {
        let eff = effectiveness(&plan(Formation::Attacking), &plan(Formation::Flood));
        let baseline = effectiveness(&plan(Formation::Attacking), &plan(Formation::Standard));
        assert!(eff.inside50 < baseline.inside50);
    }

    #[test]
    fn test_split_always_totals_eighteen() {
        for formation in [
            Formation::Standard,
            Formation::Attacking,
            Formation::Defensive,
            Formation::Flood,
            Formation::Press,
        ] {
            let (d, m, f) = formation.split();
            assert_eq!(u32::from(d) + u32::from(m) + u32::from(f), 18);
        }
    }

    #[test]
    fn test_sanitize_recovers_bad_pressure() {
        let mut plan = TacticalGamePlan { pressure: f32::NAN, ..Default::default() };
        plan.sanitize();
        assert_eq!(plan.pressure, 0.5);
        let mut plan = TacticalGamePlan { pressure: 9.0, ..Default::default() };
        plan.sanitize();
        assert_eq!(plan.pressure, 1.0);
    }
}
