//! JSON API for external integrations.
//!
//! A schema-versioned `MatchRequest` goes in, a `MatchResponse` comes
//! out. Errors are plain strings at this boundary; callers embedding the
//! engine directly should use [`crate::engine::MatchEngine`] and the
//! typed errors instead.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::engine::config::{MatchTuning, Weather};
use crate::engine::{MatchEngine, MatchPlan, MatchResult};
use crate::error::EngineError;
use crate::models::{Player, PlayerAttributes, Position, Team};
use crate::tactics::{Formation, TacticalGamePlan};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub home_team: TeamData,
    pub away_team: TeamData,
    #[serde(default)]
    pub weather: Weather,
    /// Optional tuning overrides; missing fields keep their defaults.
    #[serde(default)]
    pub tuning: Option<MatchTuning>,
}

#[derive(Debug, Deserialize)]
pub struct TeamData {
    pub name: String,
    #[serde(default)]
    pub formation: Option<String>,
    pub players: Vec<PlayerData>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub position: String,
    /// Single overall value; used when `attributes` is absent.
    #[serde(default)]
    pub overall: Option<u8>,
    #[serde(default)]
    pub attributes: Option<PlayerAttributes>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub score_line: String,
    pub home: TeamResultData,
    pub away: TeamResultData,
    pub events: Vec<serde_json::Value>,
    pub telemetry: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct TeamResultData {
    pub name: String,
    pub goals: u16,
    pub behinds: u16,
    pub points: u16,
    pub injuries: u8,
    pub interchanges: u16,
    pub average_condition: f32,
}

fn convert_player(data: PlayerData, id: u32) -> Result<Player, EngineError> {
    let position = Position::from_str_loose(&data.position)
        .ok_or_else(|| EngineError::InvalidPosition(data.position.clone()))?;
    let attributes = match data.attributes {
        Some(attrs) => attrs,
        None => PlayerAttributes::uniform(data.overall.unwrap_or(50)),
    };
    Ok(Player::new(id, data.name, position, attributes))
}

fn convert_team(data: TeamData, id_base: u32) -> Result<(Team, TacticalGamePlan), EngineError> {
    let formation = match &data.formation {
        Some(name) => Formation::from_str_loose(name)
            .ok_or_else(|| EngineError::InvalidFormation(name.clone()))?,
        None => Formation::Standard,
    };
    let mut players = Vec::with_capacity(data.players.len());
    for (i, player) in data.players.into_iter().enumerate() {
        players.push(convert_player(player, id_base + i as u32)?);
    }
    let plan = TacticalGamePlan { formation, ..Default::default() };
    Ok((Team::new(data.name, players), plan))
}

fn team_result(summary: &crate::engine::TeamSummary) -> TeamResultData {
    TeamResultData {
        name: summary.name.clone(),
        goals: summary.score.goals,
        behinds: summary.score.behinds,
        points: summary.score.points(),
        injuries: summary.injuries,
        interchanges: summary.interchanges,
        average_condition: summary.average_condition,
    }
}

fn build_response(result: &MatchResult) -> Result<MatchResponse, String> {
    let events = result
        .events
        .iter()
        .map(|event| {
            let mut value =
                serde_json::to_value(event).map_err(|e| format!("Serialization error: {}", e))?;
            // Flatten side and phase labels for downstream text generators.
            value["phase"] = json!(event.phase.label());
            if let Some(team) = event.team {
                value["team"] = json!(team.label());
            }
            Ok(value)
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(MatchResponse {
        schema_version: SCHEMA_VERSION,
        seed: result.seed,
        score_line: result.score_line(),
        home: team_result(&result.home),
        away: team_result(&result.away),
        events,
        telemetry: serde_json::to_value(&result.telemetry)
            .map_err(|e| format!("Serialization error: {}", e))?,
    })
}

/// Parse a request, simulate the match, serialize the response.
pub fn simulate_match_json(request_json: &str) -> Result<String, String> {
    let request: MatchRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", request.schema_version));
    }

    let MatchRequest { seed, home_team, away_team, weather, tuning, .. } = request;

    let (home_team, home_plan) = convert_team(home_team, 1).map_err(|e| e.to_string())?;
    let (away_team, away_plan) = convert_team(away_team, 1001).map_err(|e| e.to_string())?;

    let plan = MatchPlan {
        home_team,
        away_team,
        home_plan,
        away_plan,
        seed,
        weather,
        tuning: tuning.unwrap_or_default(),
        scripted_adjustments: Vec::new(),
    };

    let result = MatchEngine::new(plan).map_err(|e| e.to_string())?.run();
    let response = build_response(&result)?;
    serde_json::to_string(&response).map_err(|e| format!("Serialization error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json(seed: u64) -> String {
        let players: Vec<serde_json::Value> = (0..22)
            .map(|i| {
                json!({
                    "name": format!("Player {}", i),
                    "position": (["DEF", "MID", "RUC", "FWD"][i % 4]),
                    "overall": 60,
                })
            })
            .collect();
        json!({
            "schema_version": 1,
            "seed": seed,
            "home_team": { "name": "Home", "formation": "standard", "players": players },
            "away_team": { "name": "Away", "formation": "press", "players": players },
        })
        .to_string()
    }

    #[test]
    fn test_simulate_match_json_round_trip() {
        let response_json = simulate_match_json(&request_json(42)).unwrap();
        let response: serde_json::Value = serde_json::from_str(&response_json).unwrap();
        assert_eq!(response["schema_version"], 1);
        assert_eq!(response["home"]["name"], "Home");
        assert!(response["score_line"].as_str().unwrap().contains('('));
        let events = response["events"].as_array().unwrap();
        assert!(!events.is_empty());
        // The opening bounce record carries flattened snake_case labels.
        assert_eq!(events[0]["phase"], "center_bounce");
    }

    #[test]
    fn test_same_seed_same_response() {
        let a = simulate_match_json(&request_json(12345)).unwrap();
        let b = simulate_match_json(&request_json(12345)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_schema_version_is_rejected() {
        let request = request_json(1).replace(r#""schema_version":1"#, r#""schema_version":9"#);
        let err = simulate_match_json(&request).unwrap_err();
        assert!(err.contains("Unsupported schema version"));
    }

    #[test]
    fn test_invalid_position_is_rejected() {
        let request = request_json(1).replace(r#""position":"MID""#, r#""position":"QB""#);
        let err = simulate_match_json(&request).unwrap_err();
        assert!(err.contains("invalid player position"));
    }

    #[test]
    fn test_invalid_formation_is_rejected() {
        let request = request_json(1).replace(r#""formation":"press""#, r#""formation":"wishbone""#);
        let err = simulate_match_json(&request).unwrap_err();
        assert!(err.contains("invalid formation"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(simulate_match_json("{not json").unwrap_err().contains("Invalid JSON request"));
    }
}
