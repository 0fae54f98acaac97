//! Player model: roster-level identity and attributes.
//!
//! Attributes use a 0-100 scale. Everything that changes during a match
//! (condition, fatigue, injury status) lives in the engine's
//! `PlayerRuntime`, not here — this struct is read-only match input.

use serde::{Deserialize, Serialize};

/// Positional role a player is listed in on the team sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Defender,
    Midfielder,
    Ruck,
    Forward,
    /// Swing player; useful everywhere, elite nowhere.
    Utility,
}

impl Position {
    /// Parse the team-sheet abbreviations accepted by the JSON API.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEF" | "DEFENDER" | "BACK" => Some(Position::Defender),
            "MID" | "MIDFIELDER" => Some(Position::Midfielder),
            "RUC" | "RUCK" | "RUCKMAN" => Some(Position::Ruck),
            "FWD" | "FORWARD" => Some(Position::Forward),
            "UTL" | "UTIL" | "UTILITY" => Some(Position::Utility),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Ruck => "RUC",
            Position::Forward => "FWD",
            Position::Utility => "UTL",
        }
    }
}

/// Per-player attributes (0-100 scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    // Skill attributes
    pub kicking: u8,
    pub marking: u8,
    pub handball: u8,
    pub goal_sense: u8,
    pub tackling: u8,
    pub ruck_work: u8,

    // Physical attributes
    pub speed: u8,
    pub strength: u8,
    pub endurance: u8,
    /// Resistance to injury; scales injury risk down as it rises.
    pub durability: u8,
}

impl PlayerAttributes {
    /// All attributes set to the same value. Handy for tests and for
    /// request payloads that only carry a single overall number.
    pub fn uniform(value: u8) -> Self {
        let v = value.min(100);
        Self {
            kicking: v,
            marking: v,
            handball: v,
            goal_sense: v,
            tackling: v,
            ruck_work: v,
            speed: v,
            strength: v,
            endurance: v,
            durability: v,
        }
    }

    /// Fraction of the endurance scale, 0.0-1.0.
    pub fn endurance_fraction(&self) -> f32 {
        f32::from(self.endurance.min(100)) / 100.0
    }

    /// Fraction of the durability scale, 0.0-1.0.
    pub fn durability_fraction(&self) -> f32 {
        f32::from(self.durability.min(100)) / 100.0
    }
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::uniform(50)
    }
}

/// A listed player. `id` must be unique within a team for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub attributes: PlayerAttributes,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, position: Position, attributes: PlayerAttributes) -> Self {
        Self { id, name: name.into(), position, attributes }
    }
}
