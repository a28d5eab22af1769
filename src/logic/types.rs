// Custom types that are widely used are defined here.
use sqlx::{SqliteConnection, SqlitePool};

pub type Db = SqlitePool;

// A single connection, usually borrowed from an open transaction.
pub type Conn = SqliteConnection;

// Database ID types.
pub type CompetitionId = u32;
pub type TeamId = u32;
pub type GameId = u32;
pub type PlayerId = u32;

// Team aggregates are signed so that a delta can be applied in either direction.
pub type Tally = i32;

// Type conversions.
pub mod convert {
    // Convert a count to a tally. Counts in this crate never come near the limit.
    pub fn tally(num: usize) -> super::Tally {
        super::Tally::try_from(num).unwrap_or(super::Tally::MAX)
    }

    // Convert a collection length to a round or position number.
    pub fn to_u32(num: usize) -> u32 {
        u32::try_from(num).unwrap_or(u32::MAX)
    }
}
