//! Game clock: quarters, time-on, breaks.
//!
//! Real elapsed seconds are converted into game-clock decrements scaled by
//! a per-phase modifier (shots burn real time faster than game time,
//! stoppages compress the clock) and by the weather clock scale. When
//! regulation time reaches zero the quarter does not end — the clock
//! enters time-on, playing out whatever was accrued from injuries and
//! major stoppages (capped per quarter). Only when time-on is exhausted
//! does the quarter end, followed by a break of quarter-specific length.
//!
//! Invariants: `time_remaining >= 0`, `time_on_remaining >= 0`,
//! `quarter` in 1..=4 while playing, and `MatchEnded` is terminal.

use serde::{Deserialize, Serialize};

use super::config::MatchTuning;
use super::phase::Phase;

pub const FIRST_QUARTER: u8 = 1;
pub const LAST_QUARTER: u8 = 4;

/// What the clock is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockPhase {
    /// Regulation time running down.
    Playing,
    /// Regulation expired; accrued time-on running down.
    TimeOn,
    /// Between quarters.
    QuarterBreak,
    /// Terminal; nothing advances further.
    MatchEnded,
}

/// Clock-level transition reported by an advance call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    None,
    /// Regulation hit zero; time-on (possibly empty) begins.
    TimeOnStarted,
    /// A quarter other than the last finished; break begins.
    QuarterEnded { quarter: u8 },
    /// A break finished; the next quarter is under way.
    QuarterStarted { quarter: u8 },
    /// Quarter 4 time-on completed; the match is over.
    MatchEnded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingState {
    pub quarter: u8,
    /// Regulation game seconds left in the quarter.
    pub time_remaining: f32,
    /// Accrued-but-unplayed time-on game seconds.
    pub time_on_remaining: f32,
    /// Total time-on accrued this quarter (caps further accrual).
    pub time_on_accrued: f32,
    /// Real seconds left in the current break, if any.
    pub break_remaining: f32,
    pub clock: ClockPhase,
}

impl TimingState {
    pub fn new(tuning: &MatchTuning) -> Self {
        Self {
            quarter: FIRST_QUARTER,
            time_remaining: tuning.quarter_length_seconds,
            time_on_remaining: 0.0,
            time_on_accrued: 0.0,
            break_remaining: 0.0,
            clock: ClockPhase::Playing,
        }
    }

    /// Whether play (regulation or time-on) is in progress.
    pub fn in_play(&self) -> bool {
        matches!(self.clock, ClockPhase::Playing | ClockPhase::TimeOn)
    }

    /// Game seconds shown on the clock: regulation remainder while
    /// playing, time-on remainder afterwards.
    pub fn display_remaining(&self) -> f32 {
        match self.clock {
            ClockPhase::TimeOn => self.time_on_remaining,
            _ => self.time_remaining,
        }
    }

    /// Advance the in-play clock by `real_dt` real seconds spent in
    /// `phase`. Negative deltas clamp to zero. Returns the clock-level
    /// transition, if any.
    pub fn advance(
        &mut self,
        real_dt: f32,
        phase: Phase,
        weather_clock_scale: f32,
        tuning: &MatchTuning,
    ) -> ClockEvent {
        if !self.in_play() {
            return ClockEvent::None;
        }

        let real_dt = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
        let dt_game = real_dt * tuning.time_scale(phase) * weather_clock_scale.max(0.0);

        match self.clock {
            ClockPhase::Playing => {
                self.time_remaining -= dt_game;
                if self.time_remaining <= 0.0 {
                    self.time_remaining = 0.0;
                    // Regulation never ends the quarter directly; the
                    // (possibly empty) time-on period always runs first.
                    self.clock = ClockPhase::TimeOn;
                    ClockEvent::TimeOnStarted
                } else {
                    ClockEvent::None
                }
            }
            ClockPhase::TimeOn => {
                self.time_on_remaining -= dt_game;
                if self.time_on_remaining <= 0.0 {
                    self.time_on_remaining = 0.0;
                    self.end_quarter(tuning)
                } else {
                    ClockEvent::None
                }
            }
            _ => ClockEvent::None,
        }
    }

    /// Advance a between-quarters break by `real_dt` real seconds.
    pub fn advance_break(&mut self, real_dt: f32, tuning: &MatchTuning) -> ClockEvent {
        if self.clock != ClockPhase::QuarterBreak {
            return ClockEvent::None;
        }
        let real_dt = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
        self.break_remaining -= real_dt;
        if self.break_remaining <= 0.0 {
            self.break_remaining = 0.0;
            self.quarter += 1;
            self.time_remaining = tuning.quarter_length_seconds;
            self.time_on_remaining = 0.0;
            self.time_on_accrued = 0.0;
            self.clock = ClockPhase::Playing;
            ClockEvent::QuarterStarted { quarter: self.quarter }
        } else {
            ClockEvent::None
        }
    }

    /// Accrue time-on game seconds (injury or major stoppage
    /// contribution). Accrual beyond the per-quarter cap is discarded.
    /// Returns the seconds actually accrued.
    pub fn add_time_on(&mut self, seconds: f32, tuning: &MatchTuning) -> f32 {
        if !self.in_play() {
            return 0.0;
        }
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        let room = (tuning.time_on_cap_seconds - self.time_on_accrued).max(0.0);
        let added = seconds.min(room);
        self.time_on_accrued += added;
        self.time_on_remaining += added;
        added
    }

    fn end_quarter(&mut self, tuning: &MatchTuning) -> ClockEvent {
        if self.quarter >= LAST_QUARTER {
            self.clock = ClockPhase::MatchEnded;
            ClockEvent::MatchEnded
        } else {
            self.break_remaining = tuning.break_seconds[usize::from(self.quarter - 1)];
            self.clock = ClockPhase::QuarterBreak;
            ClockEvent::QuarterEnded { quarter: self.quarter }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> MatchTuning {
        MatchTuning::default()
    }

    #[test]
    fn test_negative_delta_clamps_to_zero() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        let before = state.time_remaining;
        assert_eq!(state.advance(-30.0, Phase::OpenPlay, 1.0, &t), ClockEvent::None);
        assert_eq!(state.time_remaining, before);
    }

    #[test]
    fn test_phase_scale_compresses_clock() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        // ShotOnGoal scale is 0.5: 10 real seconds burn 5 game seconds.
        state.advance(10.0, Phase::ShotOnGoal, 1.0, &t);
        assert!((state.time_remaining - (t.quarter_length_seconds - 5.0)).abs() < 1e-3);
    }

    #[test]
    fn test_regulation_expiry_enters_time_on_not_quarter_end() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        state.add_time_on(30.0, &t);
        let event = state.advance(t.quarter_length_seconds + 1.0, Phase::OpenPlay, 1.0, &t);
        assert_eq!(event, ClockEvent::TimeOnStarted);
        assert_eq!(state.clock, ClockPhase::TimeOn);
        assert_eq!(state.time_remaining, 0.0);
        assert!(state.time_on_remaining > 0.0);
    }

    #[test]
    fn test_time_on_enters_even_when_empty() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        let event = state.advance(t.quarter_length_seconds, Phase::OpenPlay, 1.0, &t);
        assert_eq!(event, ClockEvent::TimeOnStarted);
        // The empty time-on period ends the quarter on the next advance.
        let event = state.advance(1.0, Phase::OpenPlay, 1.0, &t);
        assert_eq!(event, ClockEvent::QuarterEnded { quarter: 1 });
        assert_eq!(state.clock, ClockPhase::QuarterBreak);
    }

    #[test]
    fn test_time_on_accrual_respects_cap() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        let added = state.add_time_on(t.time_on_cap_seconds + 500.0, &t);
        assert_eq!(added, t.time_on_cap_seconds);
        assert_eq!(state.add_time_on(10.0, &t), 0.0);
        assert_eq!(state.time_on_accrued, t.time_on_cap_seconds);
    }

    #[test]
    fn test_quarter_break_durations_follow_tuning() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        state.advance(t.quarter_length_seconds, Phase::OpenPlay, 1.0, &t);
        state.advance(1.0, Phase::OpenPlay, 1.0, &t);
        assert_eq!(state.break_remaining, t.break_seconds[0]);

        let event = state.advance_break(t.break_seconds[0], &t);
        assert_eq!(event, ClockEvent::QuarterStarted { quarter: 2 });
        assert_eq!(state.time_remaining, t.quarter_length_seconds);
        assert_eq!(state.time_on_accrued, 0.0);
        assert_eq!(state.clock, ClockPhase::Playing);
    }

    #[test]
    fn test_match_ends_only_after_fourth_quarter_time_on() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        for quarter in 1..=4u8 {
            assert_eq!(state.quarter, quarter);
            state.add_time_on(20.0, &t);
            assert_eq!(
                state.advance(t.quarter_length_seconds * 10.0, Phase::OpenPlay, 1.0, &t),
                ClockEvent::TimeOnStarted
            );
            let event = state.advance(t.quarter_length_seconds, Phase::OpenPlay, 1.0, &t);
            if quarter < 4 {
                assert_eq!(event, ClockEvent::QuarterEnded { quarter });
                state.advance_break(100_000.0, &t);
            } else {
                assert_eq!(event, ClockEvent::MatchEnded);
            }
        }
        assert_eq!(state.clock, ClockPhase::MatchEnded);
        // Terminal: further advances are inert.
        assert_eq!(state.advance(100.0, Phase::OpenPlay, 1.0, &t), ClockEvent::None);
    }

    #[test]
    fn test_clock_invariants_hold_under_stress() {
        let t = tuning();
        let mut state = TimingState::new(&t);
        let deltas = [13.0, -5.0, 400.0, 0.0, f32::NAN, 77.7, 1e6];
        let mut i = 0usize;
        while state.clock != ClockPhase::MatchEnded {
            let dt = deltas[i % deltas.len()];
            i += 1;
            match state.clock {
                ClockPhase::QuarterBreak => {
                    state.advance_break(dt, &t);
                }
                _ => {
                    state.add_time_on(5.0, &t);
                    state.advance(dt, Phase::Stoppage, 0.97, &t);
                }
            }
            assert!(state.time_remaining >= 0.0);
            assert!(state.time_on_remaining >= 0.0);
            assert!((FIRST_QUARTER..=LAST_QUARTER).contains(&state.quarter));
            assert!(i < 100_000, "clock failed to terminate");
        }
    }
}
