//! Fatal setup errors.
//!
//! Only broken integration surfaces as an error: a roster the engine
//! cannot field, duplicate ids, unparseable boundary input. Runtime
//! degeneracy (empty on-field groups, out-of-range tuning, exhausted
//! injury caps) is clamped or defaulted inside the engine and never
//! propagates as a failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("empty roster for team '{0}'")]
    EmptyRoster(String),

    #[error("duplicate player id {id} in team '{team}'")]
    DuplicatePlayerId { team: String, id: u32 },

    #[error("invalid formation: {0}")]
    InvalidFormation(String),

    #[error("invalid player position: {0}")]
    InvalidPosition(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
