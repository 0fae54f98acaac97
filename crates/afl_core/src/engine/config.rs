//! Match tuning knobs.
//!
//! Every numeric the simulation consumes is named here so callers can
//! rebalance without touching engine code. Values arriving from outside
//! go through [`MatchTuning::sanitize`], which clamps out-of-range input
//! to safe minimums instead of failing — a malformed knob must never
//! abort a match.
//!
//! Per-phase tables are `[f32; 6]` indexed by [`Phase::index`].

use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Match-day weather. Penalties are tuning-supplied; the variants only
/// select which penalty row applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Windy,
    Rain,
    Hot,
}

/// Penalty row for one weather type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherPenalty {
    /// Subtracted from ball-progression probabilities (0.0-1.0).
    pub progress: f32,
    /// Subtracted from shot accuracy (0.0-1.0).
    pub accuracy: f32,
    /// Multiplies game-clock decrements (1.0 = neutral).
    pub clock_scale: f32,
}

impl WeatherPenalty {
    const NEUTRAL: WeatherPenalty = WeatherPenalty { progress: 0.0, accuracy: 0.0, clock_scale: 1.0 };
}

/// All tuning knobs for one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTuning {
    // === Clock ===
    /// Nominal quarter length in game seconds (default: 1200 = 20 min).
    pub quarter_length_seconds: f32,
    /// Break durations after quarters 1..3 in real seconds
    /// (quarter-time, half-time, three-quarter-time).
    pub break_seconds: [f32; 3],
    /// Maximum time-on accrued per quarter, game seconds (default: 240).
    pub time_on_cap_seconds: f32,
    /// Fixed time-on contribution of a major stoppage (default: 12s).
    pub stoppage_time_on_seconds: f32,
    /// Chance a stoppage is "major" and accrues time-on (default: 0.35).
    pub major_stoppage_chance: f32,
    /// Sigma of the bounded normal variation applied to each time-on
    /// contribution, as a fraction of the contribution (default: 0.25).
    pub time_on_variation_sigma: f32,
    /// Game seconds consumed per real second, per phase. Values below 1.0
    /// mean the phase burns real time faster than game time.
    pub phase_time_scale: [f32; 6],
    /// Mean real-seconds duration of one resolver tick, per phase.
    pub phase_duration_mean: [f32; 6],
    /// Global multiplier on phase durations (default: 1.0).
    pub phase_duration_mult: f32,

    // === Fatigue ===
    /// Base condition drain per on-field second (default: 0.00012).
    pub base_drain_per_second: f32,
    /// Fatigue load multiplier per phase.
    pub phase_load: [f32; 6],

    // === Injury ===
    /// Base injury risk per player per on-field minute (default: 0.0015).
    pub injury_base_risk_per_minute: f32,
    /// Injury risk multiplier per phase.
    pub phase_injury_risk: [f32; 6],
    /// Weight of accumulated fatigue in injury risk (default: 2.0).
    pub injury_fatigue_weight: f32,
    /// Hard cap on injuries per team per match (default: 2).
    pub max_injuries_per_team: u8,
    /// Multiplier on per-severity injury time-on contributions.
    pub injury_time_on_scale: f32,

    // === Phase resolution ===
    /// Chance a center bounce locks straight into a ball-up (default: 0.25).
    pub center_bounce_stoppage_chance: f32,
    /// Base chance open play produces an inside-50 entry (default: 0.40).
    pub open_play_inside50_base: f32,
    /// Base chance an inside-50 yields a shot (default: 0.55).
    pub inside50_shot_base: f32,
    /// Chance an inside-50 ends as a rushed behind (default: 0.08).
    pub inside50_rushed_chance: f32,
    /// Base goal probability for a shot on goal (default: 0.45).
    pub shot_goal_base: f32,
    /// Base behind probability for a shot on goal (default: 0.33).
    pub shot_behind_base: f32,

    // === Rotation ===
    /// Minimum on-field stint before a player rotates off (default: 300s).
    pub rotation_min_seconds: f32,
    /// Condition below which a player becomes a rotation candidate.
    pub rotation_condition_threshold: f32,

    // === Tactics ===
    /// Minimum game seconds between adjustment requests per coach.
    pub adjustment_cooldown_seconds: f32,

    // === Weather ===
    pub weather_windy: WeatherPenalty,
    pub weather_rain: WeatherPenalty,
    pub weather_hot: WeatherPenalty,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            quarter_length_seconds: 1200.0,
            break_seconds: [360.0, 1200.0, 360.0],
            time_on_cap_seconds: 240.0,
            stoppage_time_on_seconds: 12.0,
            major_stoppage_chance: 0.35,
            time_on_variation_sigma: 0.25,
            // CenterBounce, Stoppage, OpenPlay, Inside50, ShotOnGoal, KickIn
            phase_time_scale: [1.0, 0.6, 1.0, 1.0, 0.5, 0.7],
            phase_duration_mean: [8.0, 18.0, 28.0, 16.0, 25.0, 12.0],
            phase_duration_mult: 1.0,
            base_drain_per_second: 0.00012,
            phase_load: [1.3, 0.7, 1.2, 1.1, 0.5, 0.8],
            injury_base_risk_per_minute: 0.0015,
            phase_injury_risk: [1.4, 0.8, 1.2, 1.1, 0.6, 0.5],
            injury_fatigue_weight: 2.0,
            max_injuries_per_team: 2,
            injury_time_on_scale: 1.0,
            center_bounce_stoppage_chance: 0.25,
            open_play_inside50_base: 0.40,
            inside50_shot_base: 0.55,
            inside50_rushed_chance: 0.08,
            shot_goal_base: 0.45,
            shot_behind_base: 0.33,
            rotation_min_seconds: 300.0,
            rotation_condition_threshold: 70.0,
            adjustment_cooldown_seconds: 180.0,
            weather_windy: WeatherPenalty { progress: 0.02, accuracy: 0.10, clock_scale: 1.0 },
            weather_rain: WeatherPenalty { progress: 0.06, accuracy: 0.12, clock_scale: 0.97 },
            weather_hot: WeatherPenalty { progress: 0.03, accuracy: 0.02, clock_scale: 0.99 },
        }
    }
}

impl MatchTuning {
    /// Clamp every knob into its safe range. Out-of-range configuration is
    /// recovered, never propagated as a failure.
    pub fn sanitize(&mut self) {
        self.quarter_length_seconds = clamp_min(self.quarter_length_seconds, 60.0);
        for b in &mut self.break_seconds {
            *b = clamp_min(*b, 0.0);
        }
        self.time_on_cap_seconds = clamp_min(self.time_on_cap_seconds, 0.0);
        self.stoppage_time_on_seconds = clamp_min(self.stoppage_time_on_seconds, 0.0);
        self.major_stoppage_chance = clamp_prob(self.major_stoppage_chance);
        self.time_on_variation_sigma = clamp_range(self.time_on_variation_sigma, 0.0, 1.0);
        for scale in &mut self.phase_time_scale {
            *scale = clamp_range(*scale, 0.05, 4.0);
        }
        for mean in &mut self.phase_duration_mean {
            *mean = clamp_range(*mean, 1.0, 120.0);
        }
        self.phase_duration_mult = clamp_range(self.phase_duration_mult, 0.1, 10.0);
        self.base_drain_per_second = clamp_range(self.base_drain_per_second, 0.0, 0.01);
        for load in &mut self.phase_load {
            *load = clamp_range(*load, 0.0, 5.0);
        }
        self.injury_base_risk_per_minute = clamp_range(self.injury_base_risk_per_minute, 0.0, 0.5);
        for risk in &mut self.phase_injury_risk {
            *risk = clamp_range(*risk, 0.0, 10.0);
        }
        self.injury_fatigue_weight = clamp_range(self.injury_fatigue_weight, 0.0, 10.0);
        self.injury_time_on_scale = clamp_range(self.injury_time_on_scale, 0.0, 10.0);
        self.center_bounce_stoppage_chance = clamp_prob(self.center_bounce_stoppage_chance);
        self.open_play_inside50_base = clamp_prob(self.open_play_inside50_base);
        self.inside50_shot_base = clamp_prob(self.inside50_shot_base);
        self.inside50_rushed_chance = clamp_prob(self.inside50_rushed_chance);
        self.shot_goal_base = clamp_prob(self.shot_goal_base);
        self.shot_behind_base = clamp_prob(self.shot_behind_base);
        self.rotation_min_seconds = clamp_min(self.rotation_min_seconds, 0.0);
        self.rotation_condition_threshold = clamp_range(self.rotation_condition_threshold, 0.0, 100.0);
        self.adjustment_cooldown_seconds = clamp_min(self.adjustment_cooldown_seconds, 0.0);
        for penalty in [&mut self.weather_windy, &mut self.weather_rain, &mut self.weather_hot] {
            penalty.progress = clamp_prob(penalty.progress);
            penalty.accuracy = clamp_prob(penalty.accuracy);
            penalty.clock_scale = clamp_range(penalty.clock_scale, 0.25, 2.0);
        }
    }

    /// Game-clock scale for a phase (unknown phases are neutral by
    /// construction since the table covers every variant).
    pub fn time_scale(&self, phase: Phase) -> f32 {
        self.phase_time_scale[phase.index()]
    }

    pub fn duration_mean(&self, phase: Phase) -> f32 {
        self.phase_duration_mean[phase.index()] * self.phase_duration_mult
    }

    pub fn load(&self, phase: Phase) -> f32 {
        self.phase_load[phase.index()]
    }

    pub fn injury_risk_mult(&self, phase: Phase) -> f32 {
        self.phase_injury_risk[phase.index()]
    }

    /// Penalty row for the given weather.
    pub fn weather_penalty(&self, weather: Weather) -> WeatherPenalty {
        match weather {
            Weather::Clear => WeatherPenalty::NEUTRAL,
            Weather::Windy => self.weather_windy,
            Weather::Rain => self.weather_rain,
            Weather::Hot => self.weather_hot,
        }
    }
}

fn clamp_min(value: f32, min: f32) -> f32 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

fn clamp_prob(value: f32) -> f32 {
    clamp_range(value, 0.0, 1.0)
}
