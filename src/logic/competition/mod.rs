// A competition owns its teams and the matches generated for them.
pub mod bracket;
pub mod group_stage;
pub mod knockout;
pub mod ranking;
pub mod round_robin;
pub mod schedule_generator;

use serde::{Deserialize, Serialize};

use crate::logic::types::CompetitionId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Format {
    #[default]
    League,
    Knockout,
    GroupAndKnockout,
    // Anything stored that this engine does not know how to schedule.
    Other(String),
}

impl Format {
    pub fn as_str(&self) -> &str {
        match self {
            Self::League => "LEAGUE",
            Self::Knockout => "KNOCKOUT",
            Self::GroupAndKnockout => "GROUP_AND_KNOCKOUT",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for Format {
    fn from(value: String) -> Self {
        match value.as_str() {
            "LEAGUE" => Self::League,
            "KNOCKOUT" => Self::Knockout,
            "GROUP_AND_KNOCKOUT" => Self::GroupAndKnockout,
            _ => Self::Other(value),
        }
    }
}

impl From<Format> for String {
    fn from(value: Format) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize)]
#[derive(sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Active,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub format: Format,
    pub rounds: u32,    // 1 = single round robin, 2 = home and away.
    pub group_size: u32,    // Only for grouped formats. 0 falls back to the configured default.
    pub status: Status,
    // Bumped by every write transaction on this competition.
    pub revision: u32,
}

// Basics.
impl Competition {
    pub fn build(name: &str, format: Format, rounds: u32, group_size: u32) -> Self {
        Self {
            name: name.to_string(),
            format,
            rounds,
            group_size,

            ..Default::default()
        }
    }

    pub fn is_knockout(&self) -> bool {
        self.format == Format::Knockout
    }
}
