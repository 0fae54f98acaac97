//! Team roster model.

use serde::{Deserialize, Serialize};

use super::player::Player;

/// Players fielded at any one time in a full-strength side.
pub const ON_FIELD_COUNT: usize = 18;

/// Interchange bench size for a full-strength side.
pub const BENCH_COUNT: usize = 4;

/// Maximum roster size for one match (on-field + interchange).
pub const MAX_ROSTER: usize = ON_FIELD_COUNT + BENCH_COUNT;

/// A match-day team: name plus roster in selection order.
///
/// The first [`ON_FIELD_COUNT`] players start on the field, the remainder
/// on the interchange bench. Rosters beyond [`MAX_ROSTER`] are truncated
/// at match setup; short rosters field whoever is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self { name: name.into(), players }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{PlayerAttributes, Position};

    #[test]
    fn test_roster_constants() {
        assert_eq!(ON_FIELD_COUNT + BENCH_COUNT, MAX_ROSTER);
        assert_eq!(ON_FIELD_COUNT, 18);
    }

    #[test]
    fn test_team_construction() {
        let team = Team::new(
            "Test FC",
            vec![Player::new(1, "A", Position::Midfielder, PlayerAttributes::default())],
        );
        assert_eq!(team.name, "Test FC");
        assert_eq!(team.players.len(), 1);
    }
}
