//! Match orchestrator.
//!
//! ```text
//! MatchPlan { teams, game plans, seed, weather, tuning }
//!        |
//!        v
//! MatchEngine::new() --- validates setup, seeds the single ChaCha8 RNG
//!        |
//!        v
//! tick loop: draw phase duration -> resolve phase (ratings + tactics +
//! weather) -> fatigue -> injuries -> rotation -> advance clock
//!        |
//!        v
//! MatchResult { score lines, events, telemetry }
//! ```
//!
//! A match runs to natural completion: quarter 4's time-on must elapse
//! before a result exists. Identical seed and inputs reproduce the score
//! line, event sequence, and telemetry exactly.

pub mod config;
pub mod context;
pub mod events;
pub mod fatigue;
pub mod injury;
pub mod phase;
pub mod rating;
pub mod timing;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

use crate::error::EngineError;
use crate::models::{Team, MAX_ROSTER};
use crate::tactics::{self, AdjustmentOutcome, TacticalAdjustment, TacticalGamePlan};

use config::{MatchTuning, Weather};
use context::{MatchContext, Score, Side, TeamState};
use events::{MatchEvent, MatchEventKind, MatchTelemetry};
use phase::Phase;
use rating::RatingEngine;
use timing::{ClockEvent, ClockPhase};

/// Real seconds stepped per tick while a quarter break runs down.
const BREAK_STEP_SECONDS: f32 = 60.0;

/// Bench player must be this much fresher to rotate on.
const ROTATION_CONDITION_MARGIN: f32 = 10.0;

/// An adjustment request scheduled ahead of time, for batch runs that
/// have no interactive coach attached.
#[derive(Debug, Clone)]
pub struct ScriptedAdjustment {
    pub side: Side,
    /// Elapsed game seconds at which the coach makes the request.
    pub at_game_seconds: f32,
    pub adjustment: TacticalAdjustment,
}

/// Everything needed to simulate one match.
#[derive(Debug, Clone)]
pub struct MatchPlan {
    pub home_team: Team,
    pub away_team: Team,
    pub home_plan: TacticalGamePlan,
    pub away_plan: TacticalGamePlan,
    pub seed: u64,
    pub weather: Weather,
    pub tuning: MatchTuning,
    pub scripted_adjustments: Vec<ScriptedAdjustment>,
}

impl MatchPlan {
    pub fn new(home_team: Team, away_team: Team, seed: u64) -> Self {
        Self {
            home_team,
            away_team,
            home_plan: TacticalGamePlan::default(),
            away_plan: TacticalGamePlan::default(),
            seed,
            weather: Weather::Clear,
            tuning: MatchTuning::default(),
            scripted_adjustments: Vec::new(),
        }
    }
}

/// One side's end-of-match summary.
#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub name: String,
    pub score: Score,
    pub injuries: u8,
    pub interchanges: u16,
    pub average_condition: f32,
}

/// Final output of one simulated match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub seed: u64,
    pub weather: Weather,
    pub home: TeamSummary,
    pub away: TeamSummary,
    pub events: Vec<MatchEvent>,
    pub telemetry: MatchTelemetry,
}

impl MatchResult {
    /// Traditional score line, e.g. `12.7 (79) - 10.10 (70)`.
    pub fn score_line(&self) -> String {
        format!(
            "{}.{} ({}) - {}.{} ({})",
            self.home.score.goals,
            self.home.score.behinds,
            self.home.score.points(),
            self.away.score.goals,
            self.away.score.behinds,
            self.away.score.points(),
        )
    }
}

/// The tick-loop engine. One instance simulates exactly one match and is
/// consumed into a [`MatchResult`].
pub struct MatchEngine {
    ctx: MatchContext,
    rating: RatingEngine,
    tuning: MatchTuning,
    weather: Weather,
    seed: u64,
    elapsed_game_seconds: f32,
    scripted: Vec<ScriptedAdjustment>,
    next_scripted: usize,
}

impl MatchEngine {
    /// Validate the plan and build the engine. Only broken integration
    /// fails here; every runtime condition is recovered in the loop.
    pub fn new(plan: MatchPlan) -> Result<MatchEngine, EngineError> {
        let MatchPlan {
            mut home_team,
            mut away_team,
            mut home_plan,
            mut away_plan,
            seed,
            weather,
            mut tuning,
            mut scripted_adjustments,
        } = plan;

        validate_team(&home_team)?;
        validate_team(&away_team)?;
        home_team.players.truncate(MAX_ROSTER);
        away_team.players.truncate(MAX_ROSTER);

        tuning.sanitize();
        home_plan.sanitize();
        away_plan.sanitize();
        scripted_adjustments
            .sort_by(|a, b| a.at_game_seconds.total_cmp(&b.at_game_seconds));

        let rng = ChaCha8Rng::seed_from_u64(seed);
        let home = TeamState::new(home_team, home_plan);
        let away = TeamState::new(away_team, away_plan);
        let mut ctx = MatchContext::new(home, away, rng, &tuning);

        log::debug!(
            "match setup: {} ({}) vs {} ({}), seed {}, weather {:?}",
            ctx.home.name,
            ctx.home.plan.effective_plan().formation.label(),
            ctx.away.name,
            ctx.away.plan.effective_plan().formation.label(),
            seed,
            weather
        );

        ctx.events.push(MatchEvent {
            quarter: 1,
            phase: Phase::CenterBounce,
            game_seconds_remaining: ctx.timing.display_remaining(),
            team: None,
            player_id: None,
            kind: MatchEventKind::QuarterStart { quarter: 1 },
        });

        Ok(MatchEngine {
            ctx,
            rating: RatingEngine::new(),
            tuning,
            weather,
            seed,
            elapsed_game_seconds: 0.0,
            scripted: scripted_adjustments,
            next_scripted: 0,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.ctx.timing.clock == ClockPhase::MatchEnded
    }

    /// Read-only view of the live match state, for inspection between
    /// ticks.
    pub fn context(&self) -> &MatchContext {
        &self.ctx
    }

    /// Coaching channel: resolve a tactical adjustment request for one
    /// side against the current match situation.
    pub fn request_adjustment(
        &mut self,
        side: Side,
        adjustment: TacticalAdjustment,
    ) -> AdjustmentOutcome {
        let score_diff = self.ctx.score_diff(side);
        let frac = self.time_remaining_fraction();
        let (team, rng) = self.ctx.team_and_rng_mut(side);
        let outcome = team.plan.request(adjustment, score_diff, frac, &self.tuning, rng);

        match outcome {
            AdjustmentOutcome::Rejected { .. } => {}
            applied_or_failed => {
                let applied = matches!(applied_or_failed, AdjustmentOutcome::Applied { .. });
                self.ctx.telemetry.team_mut(side).tactical_adjustments += 1;
                self.push_event(
                    Some(side),
                    None,
                    MatchEventKind::TacticalAdjustment {
                        adjustment: adjustment.label().to_string(),
                        applied,
                    },
                );
                log::debug!(
                    "tactical adjustment {} by {}: applied={}",
                    adjustment.label(),
                    side.label(),
                    applied
                );
            }
        }
        outcome
    }

    /// Advance the simulation one step. Returns `false` once the match
    /// has ended.
    pub fn tick(&mut self) -> bool {
        match self.ctx.timing.clock {
            ClockPhase::MatchEnded => return false,
            ClockPhase::QuarterBreak => {
                if let ClockEvent::QuarterStarted { quarter } =
                    self.ctx.timing.advance_break(BREAK_STEP_SECONDS, &self.tuning)
                {
                    self.ctx.phase = Phase::CenterBounce;
                    self.push_event(None, None, MatchEventKind::QuarterStart { quarter });
                }
                return true;
            }
            _ => {}
        }

        let phase = self.ctx.phase;
        let dt = self.draw_phase_duration(phase);
        let dt_game = dt
            * self.tuning.time_scale(phase)
            * self.tuning.weather_penalty(self.weather).clock_scale;

        self.fire_scripted_adjustments();
        self.ctx.home.plan.tick(dt_game);
        self.ctx.away.plan.tick(dt_game);

        let next_phase = self.resolve_phase(phase);

        fatigue::update_team(&mut self.ctx.home, phase, dt, &self.tuning);
        fatigue::update_team(&mut self.ctx.away, phase, dt, &self.tuning);

        self.roll_injuries(phase, dt);
        self.rotate_team(Side::Home);
        self.rotate_team(Side::Away);

        let weather_clock = self.tuning.weather_penalty(self.weather).clock_scale;
        match self.ctx.timing.advance(dt, phase, weather_clock, &self.tuning) {
            ClockEvent::None => {
                self.ctx.phase = next_phase;
            }
            ClockEvent::TimeOnStarted => {
                self.push_event(None, None, MatchEventKind::TimeOnStart);
                self.ctx.phase = next_phase;
            }
            ClockEvent::QuarterEnded { quarter } => {
                self.push_event(None, None, MatchEventKind::QuarterEnd { quarter });
            }
            ClockEvent::MatchEnded => {
                self.push_event(None, None, MatchEventKind::QuarterEnd { quarter: 4 });
                self.push_event(None, None, MatchEventKind::MatchEnd);
                log::debug!(
                    "final siren: {} {:?} - {} {:?}",
                    self.ctx.home.name,
                    self.ctx.home.score,
                    self.ctx.away.name,
                    self.ctx.away.score
                );
            }
            // advance() never yields QuarterStarted.
            ClockEvent::QuarterStarted { .. } => {}
        }

        self.elapsed_game_seconds += dt_game;
        self.ctx.telemetry.ticks += 1;
        !self.is_finished()
    }

    /// Run the match to natural completion and produce the result.
    pub fn run(mut self) -> MatchResult {
        while self.tick() {}
        self.into_result()
    }

    fn into_result(self) -> MatchResult {
        let MatchEngine { ctx, seed, weather, .. } = self;
        MatchResult {
            seed,
            weather,
            home: summarize(&ctx.home),
            away: summarize(&ctx.away),
            events: ctx.events,
            telemetry: ctx.telemetry,
        }
    }

    // ------------------------------------------------------------------
    // Tick internals
    // ------------------------------------------------------------------

    fn time_remaining_fraction(&self) -> f32 {
        let total = self.tuning.quarter_length_seconds * 4.0;
        (1.0 - self.elapsed_game_seconds / total).clamp(0.0, 1.0)
    }

    fn fire_scripted_adjustments(&mut self) {
        while self.next_scripted < self.scripted.len()
            && self.scripted[self.next_scripted].at_game_seconds <= self.elapsed_game_seconds
        {
            let scripted = self.scripted[self.next_scripted].clone();
            self.next_scripted += 1;
            self.request_adjustment(scripted.side, scripted.adjustment);
        }
    }

    /// Real seconds this resolver tick occupies: phase mean with bounded
    /// normal variation.
    fn draw_phase_duration(&mut self, phase: Phase) -> f32 {
        let mean = self.tuning.duration_mean(phase);
        let z: f32 = self.ctx.rng.sample(StandardNormal);
        (mean * (1.0 + 0.25 * z)).clamp(mean * 0.4, mean * 1.8)
    }

    /// Rate one side for the phase; returns the rating and the acting
    /// player's id.
    fn rate_side(&mut self, side: Side, phase: Phase) -> (f32, Option<u32>) {
        let team = match side {
            Side::Home => &self.ctx.home,
            Side::Away => &self.ctx.away,
        };
        let positioning = team.plan.positioning_modifier(phase);
        let rating = self.rating.rate(team, phase, positioning, &mut self.ctx.rng);
        let actor = self.rating.last_top_player().map(|idx| team.roster[idx].id);
        (rating, actor)
    }

    fn push_event(&mut self, team: Option<Side>, player_id: Option<u32>, kind: MatchEventKind) {
        self.ctx.events.push(MatchEvent {
            quarter: self.ctx.timing.quarter,
            phase: self.ctx.phase,
            game_seconds_remaining: self.ctx.timing.display_remaining(),
            team,
            player_id,
            kind,
        });
    }

    /// Accrue a time-on contribution with bounded random variation.
    fn accrue_time_on(&mut self, base_seconds: f32) {
        if base_seconds <= 0.0 {
            return;
        }
        let z: f32 = self.ctx.rng.sample(StandardNormal);
        let varied = (base_seconds * (1.0 + self.tuning.time_on_variation_sigma * z))
            .clamp(0.0, base_seconds * 2.0);
        let added = self.ctx.timing.add_time_on(varied, &self.tuning);
        self.ctx.telemetry.time_on_accrued += added;
    }

    /// Resolve the current phase's outcome and return the next phase.
    /// Every return value is an edge of the fixed transition graph.
    fn resolve_phase(&mut self, phase: Phase) -> Phase {
        let eff = tactics::effectiveness(
            self.ctx.home.plan.effective_plan(),
            self.ctx.away.plan.effective_plan(),
        );
        let weather = self.tuning.weather_penalty(self.weather);
        let attacking = self.ctx.possession;
        // Tactical deltas are home-signed; flip for an away attacker.
        let attack_delta = |delta: f32| match attacking {
            Side::Home => delta,
            Side::Away => -delta,
        };

        match phase {
            Phase::CenterBounce | Phase::Stoppage => {
                let (home_r, home_actor) = self.rate_side(Side::Home, phase);
                let (away_r, away_actor) = self.rate_side(Side::Away, phase);
                let p_home = (home_r / (home_r + away_r) + eff.for_phase(phase)).clamp(0.05, 0.95);
                let winner =
                    if self.ctx.rng.gen::<f32>() < p_home { Side::Home } else { Side::Away };
                let actor = match winner {
                    Side::Home => home_actor,
                    Side::Away => away_actor,
                };
                self.ctx.possession = winner;
                self.ctx.telemetry.team_mut(winner).clearances += 1;

                if phase == Phase::Stoppage {
                    if self.ctx.rng.gen::<f32>() < self.tuning.major_stoppage_chance {
                        self.accrue_time_on(self.tuning.stoppage_time_on_seconds);
                    }
                    self.push_event(Some(winner), actor, MatchEventKind::StoppageClear);
                    Phase::OpenPlay
                } else {
                    self.push_event(Some(winner), actor, MatchEventKind::CenterBounceWin);
                    if self.ctx.rng.gen::<f32>() < self.tuning.center_bounce_stoppage_chance {
                        Phase::Stoppage
                    } else {
                        Phase::OpenPlay
                    }
                }
            }
            Phase::OpenPlay => {
                let (att_r, att_actor) = self.rate_side(attacking, phase);
                let (def_r, _) = self.rate_side(attacking.opponent(), phase);
                let p_entry = (self.tuning.open_play_inside50_base * (att_r / def_r)
                    + attack_delta(eff.for_phase(phase))
                    - weather.progress)
                    .clamp(0.05, 0.90);

                if self.ctx.rng.gen::<f32>() < p_entry {
                    self.ctx.telemetry.team_mut(attacking).inside_50s += 1;
                    self.push_event(Some(attacking), att_actor, MatchEventKind::Inside50Entry);
                    Phase::Inside50
                } else {
                    self.ctx.telemetry.team_mut(attacking).stoppages += 1;
                    self.push_event(None, None, MatchEventKind::BallUp);
                    Phase::Stoppage
                }
            }
            Phase::Inside50 => {
                let (att_r, att_actor) = self.rate_side(attacking, phase);
                let (def_r, def_actor) = self.rate_side(attacking.opponent(), phase);
                let p_shot = (self.tuning.inside50_shot_base * (att_r / def_r)
                    + attack_delta(eff.for_phase(phase))
                    - weather.progress)
                    .clamp(0.05, 0.90);

                let draw = self.ctx.rng.gen::<f32>();
                if draw < p_shot {
                    self.push_event(Some(attacking), att_actor, MatchEventKind::ShotOpportunity);
                    Phase::ShotOnGoal
                } else if draw < p_shot + self.tuning.inside50_rushed_chance {
                    // Defenders concede a rushed behind and kick in.
                    let defending = attacking.opponent();
                    self.ctx.team_mut(attacking).score.behinds += 1;
                    self.ctx.telemetry.team_mut(attacking).behinds += 1;
                    self.push_event(Some(defending), def_actor, MatchEventKind::RushedBehind);
                    self.ctx.possession = defending;
                    Phase::KickIn
                } else {
                    self.ctx.telemetry.team_mut(attacking).stoppages += 1;
                    self.push_event(None, None, MatchEventKind::BallUp);
                    Phase::Stoppage
                }
            }
            Phase::ShotOnGoal => {
                let (att_r, att_actor) = self.rate_side(attacking, phase);
                let (def_r, _) = self.rate_side(attacking.opponent(), phase);
                let defending = attacking.opponent();

                let p_goal = (self.tuning.shot_goal_base * (0.85 + 0.15 * (att_r - def_r))
                    + attack_delta(eff.for_phase(phase)) * 0.5
                    - weather.accuracy)
                    .clamp(0.05, 0.85);
                let p_behind = self.tuning.shot_behind_base.min(1.0 - p_goal);

                self.ctx.telemetry.team_mut(attacking).shots += 1;
                let draw = self.ctx.rng.gen::<f32>();
                self.ctx.possession = defending;
                if draw < p_goal {
                    self.ctx.team_mut(attacking).score.goals += 1;
                    self.ctx.telemetry.team_mut(attacking).goals += 1;
                    self.push_event(Some(attacking), att_actor, MatchEventKind::Goal);
                    // Restart flows through open play with the conceding
                    // side in possession.
                    Phase::OpenPlay
                } else if draw < p_goal + p_behind {
                    self.ctx.team_mut(attacking).score.behinds += 1;
                    self.ctx.telemetry.team_mut(attacking).behinds += 1;
                    self.push_event(Some(attacking), att_actor, MatchEventKind::Behind);
                    Phase::KickIn
                } else {
                    self.push_event(Some(attacking), att_actor, MatchEventKind::ShotMissed);
                    Phase::OpenPlay
                }
            }
            Phase::KickIn => {
                let kicking = self.ctx.possession;
                let (_, actor) = self.rate_side(kicking, phase);
                self.ctx.telemetry.team_mut(kicking).kick_ins += 1;
                self.push_event(Some(kicking), actor, MatchEventKind::KickIn);
                Phase::OpenPlay
            }
        }
    }

    fn roll_injuries(&mut self, phase: Phase, dt: f32) {
        for side in [Side::Home, Side::Away] {
            let occurrence = {
                let (team, rng) = self.ctx.team_and_rng_mut(side);
                injury::roll_team(team, phase, dt, &self.tuning, rng)
            };
            let Some(occ) = occurrence else { continue };

            self.ctx.telemetry.team_mut(side).injuries += 1;
            self.accrue_time_on(occ.time_on_seconds);
            self.push_event(
                Some(side),
                Some(occ.player_id),
                MatchEventKind::Injury { injury: occ.injury },
            );

            // Bring on a bench replacement when one exists; otherwise the
            // team plays on short.
            let replacement = self.ctx.team(side).best_bench_player();
            if let Some(on_idx) = replacement {
                let team = self.ctx.team_mut(side);
                team.runtime[on_idx].on_field = true;
                team.runtime[on_idx].seconds_since_rotation = 0.0;
                team.interchanges += 1;
                let on_id = team.roster[on_idx].id;
                self.ctx.telemetry.team_mut(side).interchanges += 1;
                self.push_event(
                    Some(side),
                    None,
                    MatchEventKind::Interchange { off_id: occ.player_id, on_id },
                );
            }
        }
    }

    /// Rotation policy: at most one interchange per side per tick. The
    /// most spent eligible on-field player swaps with the freshest bench
    /// player, provided the bench player is meaningfully fresher.
    fn rotate_team(&mut self, side: Side) {
        let swap = {
            let team = self.ctx.team(side);
            let mut off: Option<usize> = None;
            for (i, rt) in team.runtime.iter().enumerate() {
                if !rt.on_field || rt.injury.is_some() {
                    continue;
                }
                if rt.seconds_since_rotation < self.tuning.rotation_min_seconds
                    || rt.condition >= self.tuning.rotation_condition_threshold
                {
                    continue;
                }
                match off {
                    Some(o) if team.runtime[o].condition <= rt.condition => {}
                    _ => off = Some(i),
                }
            }
            off.and_then(|off_idx| {
                team.best_bench_player().and_then(|on_idx| {
                    let fresher = team.runtime[on_idx].condition
                        >= team.runtime[off_idx].condition + ROTATION_CONDITION_MARGIN;
                    fresher.then_some((off_idx, on_idx))
                })
            })
        };

        let Some((off_idx, on_idx)) = swap else { return };
        let team = self.ctx.team_mut(side);
        team.runtime[off_idx].on_field = false;
        team.runtime[off_idx].seconds_since_rotation = 0.0;
        team.runtime[on_idx].on_field = true;
        team.runtime[on_idx].seconds_since_rotation = 0.0;
        team.interchanges += 1;
        let off_id = team.roster[off_idx].id;
        let on_id = team.roster[on_idx].id;
        self.ctx.telemetry.team_mut(side).interchanges += 1;
        self.push_event(Some(side), None, MatchEventKind::Interchange { off_id, on_id });
    }
}

fn validate_team(team: &Team) -> Result<(), EngineError> {
    if team.players.is_empty() {
        return Err(EngineError::EmptyRoster(team.name.clone()));
    }
    for (i, player) in team.players.iter().enumerate() {
        if team.players[..i].iter().any(|other| other.id == player.id) {
            return Err(EngineError::DuplicatePlayerId {
                team: team.name.clone(),
                id: player.id,
            });
        }
    }
    Ok(())
}

fn summarize(team: &TeamState) -> TeamSummary {
    TeamSummary {
        name: team.name.clone(),
        score: team.score,
        injuries: team.injuries,
        interchanges: team.interchanges,
        average_condition: team.average_condition(),
    }
}
