//! Fatigue model.
//!
//! On-field players drain condition with the phase's physical load and
//! their endurance; bench players recover; injured players are skipped
//! entirely. The fatigue multiplier is recomputed from condition every
//! tick and is what the rating engine actually consumes.
//!
//! Invariants: condition in [0, 100], fatigue_mult in [0.6, 1.0].

use super::config::MatchTuning;
use super::context::TeamState;
use super::phase::Phase;

/// Bench condition recovery per second.
const BENCH_RECOVERY_PER_SECOND: f32 = 0.6;

/// Floor of the fatigue multiplier (a gassed player still contributes).
pub const FATIGUE_MULT_FLOOR: f32 = 0.6;

/// Fatigue multiplier for a condition value.
pub fn fatigue_mult(condition: f32) -> f32 {
    (0.75 + 0.25 * (condition.clamp(0.0, 100.0) / 100.0)).max(FATIGUE_MULT_FLOOR)
}

/// Advance fatigue for every player in a team over `dt` real seconds
/// spent in `phase`.
pub fn update_team(team: &mut TeamState, phase: Phase, dt: f32, tuning: &MatchTuning) {
    let dt = dt.max(0.0);
    let load = tuning.load(phase);

    for idx in 0..team.runtime.len() {
        let endurance_frac = team.roster[idx].attributes.endurance_fraction();
        let rt = &mut team.runtime[idx];
        if rt.injury.is_some() {
            // Injured players neither drain nor recover.
            continue;
        }
        if rt.on_field {
            let drain =
                tuning.base_drain_per_second * load * (1.15 - 0.5 * endurance_frac) * dt;
            rt.condition = (rt.condition - drain * 100.0).max(0.0);
            rt.seconds_played += dt;
            rt.seconds_since_rotation += dt;
        } else {
            rt.condition = (rt.condition + BENCH_RECOVERY_PER_SECOND * dt).min(100.0);
        }
        rt.fatigue_mult = fatigue_mult(rt.condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, PlayerAttributes, Position, Team};
    use crate::tactics::TacticalGamePlan;

    fn team_with(endurance: u8, count: usize) -> TeamState {
        let players = (0..count)
            .map(|i| {
                let mut attrs = PlayerAttributes::uniform(50);
                attrs.endurance = endurance;
                Player::new(i as u32, format!("P{}", i), Position::Midfielder, attrs)
            })
            .collect();
        TeamState::new(Team::new("Testers", players), TacticalGamePlan::default())
    }

    #[test]
    fn test_drain_formula_matches_model() {
        let tuning = MatchTuning::default();
        let mut team = team_with(80, 1);
        update_team(&mut team, Phase::OpenPlay, 60.0, &tuning);

        let expected_drain =
            tuning.base_drain_per_second * tuning.load(Phase::OpenPlay) * (1.15 - 0.5 * 0.8) * 60.0;
        let expected = 100.0 - expected_drain * 100.0;
        assert!((team.runtime[0].condition - expected).abs() < 1e-4);
    }

    #[test]
    fn test_low_endurance_drains_faster() {
        let tuning = MatchTuning::default();
        let mut plodder = team_with(10, 1);
        let mut runner = team_with(95, 1);
        update_team(&mut plodder, Phase::CenterBounce, 600.0, &tuning);
        update_team(&mut runner, Phase::CenterBounce, 600.0, &tuning);
        assert!(plodder.runtime[0].condition < runner.runtime[0].condition);
    }

    #[test]
    fn test_bench_recovers_and_caps_at_hundred() {
        let tuning = MatchTuning::default();
        let mut team = team_with(50, 22);
        team.runtime[20].condition = 40.0;
        update_team(&mut team, Phase::OpenPlay, 30.0, &tuning);
        // 40 + 0.6 * 30 = 58
        assert!((team.runtime[20].condition - 58.0).abs() < 1e-4);

        update_team(&mut team, Phase::OpenPlay, 10_000.0, &tuning);
        assert_eq!(team.runtime[20].condition, 100.0);
    }

    #[test]
    fn test_injured_players_are_skipped() {
        let tuning = MatchTuning::default();
        let mut team = team_with(50, 22);
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        team.runtime[0].injury = Some(crate::engine::injury::sample_injury(&mut rng));
        team.runtime[0].on_field = false;
        team.runtime[0].condition = 50.0;
        update_team(&mut team, Phase::OpenPlay, 500.0, &tuning);
        // Neither drained nor recovered.
        assert_eq!(team.runtime[0].condition, 50.0);
    }

    #[test]
    fn test_fatigue_mult_bounds() {
        assert_eq!(fatigue_mult(100.0), 1.0);
        assert_eq!(fatigue_mult(0.0), 0.75);
        assert!(fatigue_mult(-50.0) >= FATIGUE_MULT_FLOOR);
        assert!(fatigue_mult(500.0) <= 1.0);
    }

    #[test]
    fn test_condition_floors_at_zero() {
        let mut tuning = MatchTuning::default();
        tuning.base_drain_per_second = 0.01; // sanitize() upper bound
        let mut team = team_with(0, 1);
        for _ in 0..200 {
            update_team(&mut team, Phase::CenterBounce, 60.0, &tuning);
            assert!(team.runtime[0].condition >= 0.0);
            assert!(team.runtime[0].fatigue_mult >= FATIGUE_MULT_FLOOR);
            assert!(team.runtime[0].fatigue_mult <= 1.0);
        }
        assert_eq!(team.runtime[0].condition, 0.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn condition_and_mult_stay_bounded(
                endurance in 0u8..=100,
                start in 0.0f32..=100.0,
                dt in 0.0f32..=600.0,
                phase_idx in 0usize..6,
            ) {
                let tuning = MatchTuning::default();
                let mut team = team_with(endurance, 1);
                team.runtime[0].condition = start;
                let phase = crate::engine::phase::PHASES[phase_idx];
                update_team(&mut team, phase, dt, &tuning);
                prop_assert!((0.0..=100.0).contains(&team.runtime[0].condition));
                prop_assert!((FATIGUE_MULT_FLOOR..=1.0).contains(&team.runtime[0].fatigue_mult));
            }
        }
    }
}
