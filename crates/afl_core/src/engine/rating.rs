//! Rating engine.
//!
//! Scores a team's on-field group for a phase as a bounded scalar in
//! [`MIN_RATING`, `MAX_RATING`]. Only a handful of players genuinely
//! contest any phase, so selection is a partial top-N pass
//! (selection-sort style, O(count x N)) over fixed scratch buffers
//! rather than a full sort.
//!
//! Hot-path contract: the generator is supplied by the caller — the
//! engine never constructs one — and the scratch buffers live in this
//! value, owned by exactly one match context. The common path performs
//! no heap allocation.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::context::TeamState;
use super::phase::Phase;
use crate::models::{PlayerAttributes, Position, MAX_ROSTER};

pub const MIN_RATING: f32 = 0.3;
pub const MAX_RATING: f32 = 2.5;

/// Rating used when a team has nobody on the field for the contest.
pub const NEUTRAL_RATING: f32 = 1.0;

/// Weighted attribute score at nominal attributes and full fitness;
/// normalizes typical outputs to sit around 1.0.
const BASELINE_SCORE: f32 = 50.0;

/// Relative magnitude of the per-call rating jitter.
const JITTER_SPAN: f32 = 0.08;

/// How many players meaningfully contest each phase.
const PARTICIPANTS: [usize; 6] = [4, 6, 10, 8, 6, 6];

/// Positional suitability multiplier, rows = [`Position`] in declaration
/// order, columns = [`Phase::index`]. Ruck/mid dominate the bounce,
/// forwards the scoring phases, defenders the kick-in rebound.
const SUITABILITY: [[f32; 6]; 5] = [
    //             CB    Stop  Open  I50   Shot  KickIn
    /* Defender */ [0.70, 0.90, 1.00, 1.10, 1.00, 1.25],
    /* Midfield */ [1.20, 1.25, 1.20, 0.95, 0.80, 0.90],
    /* Ruck     */ [1.35, 1.20, 0.80, 0.85, 0.80, 0.80],
    /* Forward  */ [0.60, 0.80, 0.90, 1.20, 1.30, 0.60],
    /* Utility  */ [1.00, 1.00, 1.00, 1.00, 1.00, 1.00],
];

fn position_row(position: Position) -> usize {
    match position {
        Position::Defender => 0,
        Position::Midfielder => 1,
        Position::Ruck => 2,
        Position::Forward => 3,
        Position::Utility => 4,
    }
}

/// Phase-weighted raw attribute score (0-ish to ~130 for an elite,
/// perfectly suited player).
fn phase_score(attrs: &PlayerAttributes, position: Position, phase: Phase) -> f32 {
    let a = |v: u8| f32::from(v);
    let weighted = match phase {
        Phase::CenterBounce => {
            a(attrs.ruck_work) * 0.35
                + a(attrs.strength) * 0.20
                + a(attrs.tackling) * 0.20
                + a(attrs.handball) * 0.15
                + a(attrs.speed) * 0.10
        }
        Phase::Stoppage => {
            a(attrs.tackling) * 0.30
                + a(attrs.handball) * 0.25
                + a(attrs.strength) * 0.20
                + a(attrs.ruck_work) * 0.15
                + a(attrs.speed) * 0.10
        }
        Phase::OpenPlay => {
            a(attrs.kicking) * 0.25
                + a(attrs.speed) * 0.25
                + a(attrs.handball) * 0.20
                + a(attrs.endurance) * 0.15
                + a(attrs.marking) * 0.15
        }
        Phase::Inside50 => {
            a(attrs.marking) * 0.30
                + a(attrs.goal_sense) * 0.30
                + a(attrs.kicking) * 0.20
                + a(attrs.speed) * 0.20
        }
        Phase::ShotOnGoal => {
            a(attrs.goal_sense) * 0.45 + a(attrs.kicking) * 0.35 + a(attrs.marking) * 0.20
        }
        Phase::KickIn => {
            a(attrs.kicking) * 0.40
                + a(attrs.marking) * 0.25
                + a(attrs.speed) * 0.20
                + a(attrs.handball) * 0.15
        }
    };
    weighted * SUITABILITY[position_row(position)][phase.index()]
}

/// Phase rating engine with reusable scratch storage.
///
/// One instance per match context; never shared across concurrently
/// running matches.
pub struct RatingEngine {
    idx: [usize; MAX_ROSTER],
    score: [f32; MAX_ROSTER],
    last_top: Option<usize>,
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingEngine {
    pub fn new() -> Self {
        Self { idx: [0; MAX_ROSTER], score: [0.0; MAX_ROSTER], last_top: None }
    }

    /// Roster index of the best-suited player from the most recent
    /// [`rate`](Self::rate) call; used to attribute events to an actor.
    pub fn last_top_player(&self) -> Option<usize> {
        self.last_top
    }

    /// Rate `team`'s on-field group for `phase`.
    ///
    /// `positioning_mod` is the tactical per-player modifier (formation
    /// bonus minus disruption). An empty group rates [`NEUTRAL_RATING`]
    /// without consuming randomness.
    pub fn rate(
        &mut self,
        team: &TeamState,
        phase: Phase,
        positioning_mod: f32,
        rng: &mut ChaCha8Rng,
    ) -> f32 {
        let mut count = 0usize;
        for (i, rt) in team.runtime.iter().enumerate() {
            if !rt.on_field || rt.injury.is_some() {
                continue;
            }
            if count == MAX_ROSTER {
                break;
            }
            let player = &team.roster[i];
            self.idx[count] = i;
            self.score[count] = phase_score(&player.attributes, player.position, phase);
            count += 1;
        }

        if count == 0 {
            self.last_top = None;
            return NEUTRAL_RATING;
        }

        let n = PARTICIPANTS[phase.index()].min(count);

        // Partial selection sort: after pass i, slot i holds the i-th best
        // candidate. Strict comparison picks the earliest of tied scores,
        // and the winner is rotated (not swapped) into place so the
        // remainder keeps its original roster order for later passes.
        for i in 0..n {
            let mut best = i;
            for j in (i + 1)..count {
                if self.score[j] > self.score[best] {
                    best = j;
                }
            }
            while best > i {
                self.idx.swap(best - 1, best);
                self.score.swap(best - 1, best);
                best -= 1;
            }
        }
        self.last_top = Some(self.idx[0]);

        let mut sum = 0.0;
        for i in 0..n {
            let fatigue = team.runtime[self.idx[i]].fatigue_mult;
            sum += self.score[i] * fatigue * (1.0 + positioning_mod);
        }
        let mean = sum / n as f32;

        let jitter = 1.0 + (rng.gen::<f32>() - 0.5) * JITTER_SPAN;
        (mean / BASELINE_SCORE * jitter).clamp(MIN_RATING, MAX_RATING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, PlayerAttributes, Team};
    use crate::tactics::TacticalGamePlan;
    use rand::SeedableRng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn uniform_team(count: usize, value: u8) -> TeamState {
        let players = (0..count)
            .map(|i| {
                Player::new(
                    i as u32,
                    format!("P{}", i),
                    Position::Midfielder,
                    PlayerAttributes::uniform(value),
                )
            })
            .collect();
        TeamState::new(Team::new("Testers", players), TacticalGamePlan::default())
    }

    #[test]
    fn test_empty_group_rates_neutral_without_consuming_rng() {
        let mut engine = RatingEngine::new();
        let mut team = uniform_team(22, 50);
        for rt in &mut team.runtime {
            rt.on_field = false;
        }
        let mut r = rng(1);
        let probe = r.clone().gen::<u64>();
        assert_eq!(engine.rate(&team, Phase::CenterBounce, 0.0, &mut r), NEUTRAL_RATING);
        assert_eq!(engine.last_top_player(), None);
        assert_eq!(r.gen::<u64>(), probe);
    }

    #[test]
    fn test_rating_within_bounds_for_extremes() {
        let mut engine = RatingEngine::new();
        let mut r = rng(2);
        for value in [0u8, 1, 50, 99, 100] {
            for phase in crate::engine::phase::PHASES {
                let team = uniform_team(22, value);
                let rating = engine.rate(&team, phase, 0.15, &mut r);
                assert!((MIN_RATING..=MAX_RATING).contains(&rating), "rating {}", rating);
            }
        }
    }

    #[test]
    fn test_stronger_team_rates_higher() {
        let mut engine = RatingEngine::new();
        let strong = uniform_team(22, 90);
        let weak = uniform_team(22, 30);
        // Same generator state for both calls.
        let s = engine.rate(&strong, Phase::OpenPlay, 0.0, &mut rng(3));
        let w = engine.rate(&weak, Phase::OpenPlay, 0.0, &mut rng(3));
        assert!(s > w);
    }

    #[test]
    fn test_fatigue_scales_rating_down() {
        let mut engine = RatingEngine::new();
        let fresh = uniform_team(22, 70);
        let mut tired = uniform_team(22, 70);
        for rt in &mut tired.runtime {
            rt.condition = 0.0;
            rt.fatigue_mult = 0.75;
        }
        let f = engine.rate(&fresh, Phase::OpenPlay, 0.0, &mut rng(4));
        let t = engine.rate(&tired, Phase::OpenPlay, 0.0, &mut rng(4));
        assert!(t < f);
    }

    #[test]
    fn test_partial_selection_matches_full_sort() {
        let mut engine = RatingEngine::new();
        let mut team = uniform_team(22, 50);
        // Give players distinct, scrambled kicking scores.
        for (i, player) in team.roster.iter_mut().enumerate() {
            player.attributes = PlayerAttributes::uniform(((i * 37) % 90 + 10) as u8);
        }
        engine.rate(&team, Phase::OpenPlay, 0.0, &mut rng(5));

        let mut expected: Vec<(usize, f32)> = team
            .runtime
            .iter()
            .enumerate()
            .filter(|(_, rt)| rt.on_field)
            .map(|(i, _)| {
                (i, phase_score(&team.roster[i].attributes, team.roster[i].position, Phase::OpenPlay))
            })
            .collect();
        expected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        assert_eq!(engine.last_top_player(), Some(expected[0].0));
    }

    #[test]
    fn test_ties_break_by_original_order() {
        let mut engine = RatingEngine::new();
        let team = uniform_team(22, 60);
        engine.rate(&team, Phase::CenterBounce, 0.0, &mut rng(6));
        // All scores equal: the first on-field player must win the tie.
        assert_eq!(engine.last_top_player(), Some(0));
    }

    #[test]
    fn test_ties_at_the_cutoff_resolve_by_roster_order() {
        // Players 0-3 tied, player 4 strictly best; the center bounce
        // selects four, so exactly one tied player misses out — the last
        // in roster order.
        let mut engine = RatingEngine::new();
        let mut team = uniform_team(5, 60);
        team.roster[4].attributes = PlayerAttributes::uniform(90);

        let baseline = engine.rate(&team, Phase::CenterBounce, 0.0, &mut rng(8));

        // Player 3 sits beyond the cutoff; its fatigue must not matter.
        team.runtime[3].fatigue_mult = 0.6;
        assert_eq!(engine.rate(&team, Phase::CenterBounce, 0.0, &mut rng(8)), baseline);

        // Player 0 is selected; its fatigue must.
        team.runtime[0].fatigue_mult = 0.6;
        assert_ne!(engine.rate(&team, Phase::CenterBounce, 0.0, &mut rng(8)), baseline);
    }

    #[test]
    fn test_same_seed_same_rating() {
        let mut engine = RatingEngine::new();
        let team = uniform_team(22, 64);
        let a = engine.rate(&team, Phase::Inside50, 0.02, &mut rng(7));
        let b = engine.rate(&team, Phase::Inside50, 0.02, &mut rng(7));
        assert_eq!(a, b);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rating_bounded_for_any_group(
                seed in any::<u64>(),
                count in 1usize..=22,
                value in 0u8..=100,
                phase_idx in 0usize..6,
                positioning in -0.2f32..=0.2,
            ) {
                let mut engine = RatingEngine::new();
                let team = uniform_team(count, value);
                let phase = crate::engine::phase::PHASES[phase_idx];
                let rating = engine.rate(&team, phase, positioning, &mut rng(seed));
                prop_assert!((MIN_RATING..=MAX_RATING).contains(&rating));
            }
        }
    }
}
