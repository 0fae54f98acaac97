//! Match input models: players, attributes, rosters.

pub mod player;
pub mod team;

pub use player::{Player, PlayerAttributes, Position};
pub use team::{Team, BENCH_COUNT, MAX_ROSTER, ON_FIELD_COUNT};
