//! Match event stream and telemetry counters.
//!
//! Events are append-only output records: the engine writes them once per
//! tick and never reads them back. External collaborators (commentary
//! generation, season aggregation) consume the ordered stream; the core
//! never interprets its textual rendering.

use serde::Serialize;

use super::context::Side;
use super::injury::Injury;
use super::phase::Phase;

/// What happened in one event record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MatchEventKind {
    QuarterStart { quarter: u8 },
    CenterBounceWin,
    StoppageClear,
    BallUp,
    Inside50Entry,
    /// The attackers worked a scoring chance inside 50; a shot follows.
    ShotOpportunity,
    Goal,
    Behind,
    RushedBehind,
    ShotMissed,
    KickIn,
    Injury { injury: Injury },
    Interchange { off_id: u32, on_id: u32 },
    TacticalAdjustment { adjustment: String, applied: bool },
    TimeOnStart,
    QuarterEnd { quarter: u8 },
    MatchEnd,
}

/// One ordered record in the match event stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvent {
    pub quarter: u8,
    /// Phase the resolver was in when the event fired.
    pub phase: Phase,
    /// Game seconds left on the clock (regulation or time-on).
    pub game_seconds_remaining: f32,
    /// Team the event is attributed to, when one applies.
    pub team: Option<Side>,
    /// Acting player, when one applies.
    pub player_id: Option<u32>,
    pub kind: MatchEventKind,
}

/// Aggregate per-team counters, written once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamTelemetry {
    pub clearances: u16,
    pub inside_50s: u16,
    pub shots: u16,
    pub goals: u16,
    pub behinds: u16,
    pub kick_ins: u16,
    pub stoppages: u16,
    pub injuries: u16,
    pub interchanges: u16,
    pub tactical_adjustments: u16,
}

/// Whole-match telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchTelemetry {
    pub home: TeamTelemetry,
    pub away: TeamTelemetry,
    /// Resolver ticks executed.
    pub ticks: u64,
    /// Total time-on game seconds accrued across the match.
    pub time_on_accrued: f32,
}

impl MatchTelemetry {
    pub fn team(&self, side: Side) -> &TeamTelemetry {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut TeamTelemetry {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tagged_kind() {
        let event = MatchEvent {
            quarter: 2,
            phase: Phase::ShotOnGoal,
            game_seconds_remaining: 312.5,
            team: Some(Side::Home),
            player_id: Some(7),
            kind: MatchEventKind::Goal,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"goal"#));
        assert!(json.contains(r#""quarter":2"#));
    }

    #[test]
    fn test_telemetry_side_accessors() {
        let mut telemetry = MatchTelemetry::default();
        telemetry.team_mut(Side::Away).goals += 3;
        assert_eq!(telemetry.team(Side::Away).goals, 3);
        assert_eq!(telemetry.team(Side::Home).goals, 0);
    }
}
