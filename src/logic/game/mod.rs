// A single match between two teams of a competition.
pub mod score;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::logic::types::{CompetitionId, GameId, TeamId};

// One side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[derive(Serialize, Deserialize)]
#[derive(FromRow)]
pub struct Game {
    pub id: GameId,
    pub comp_id: CompetitionId,
    // None means the slot has not been filled yet (later knockout rounds) or holds a bye.
    pub team1_id: Option<TeamId>,
    pub team2_id: Option<TeamId>,
    pub round_number: u32,
    pub round_name: String,
    // Index of the match within its round, 0-based.
    pub bracket_position: u32,
    pub result: Option<String>,
    pub winner_id: Option<TeamId>,
    pub match_date: Option<Date>,
}

// Basics.
impl Game {
    // Stored result of a match decided by a bye.
    pub const BYE_RESULT: &str = "BYE";

    pub fn build(round_number: u32, round_name: &str, bracket_position: u32, team1_id: Option<TeamId>, team2_id: Option<TeamId>) -> Self {
        Self {
            team1_id,
            team2_id,
            round_number,
            round_name: round_name.to_string(),
            bracket_position,

            ..Default::default()
        }
    }

    // Build a first round knockout match where one side is empty.
    // The remaining team advances without playing.
    pub fn build_bye(round_name: &str, bracket_position: u32, team1_id: Option<TeamId>, team2_id: Option<TeamId>) -> Self {
        let mut game = Self::build(1, round_name, bracket_position, team1_id, team2_id);
        game.winner_id = team1_id.or(team2_id);
        game.result = Some(Self::BYE_RESULT.to_string());
        return game;
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_bye(&self) -> bool {
        self.result.as_deref() == Some(Self::BYE_RESULT)
    }

    // Both team IDs, if both slots are filled.
    pub fn teams(&self) -> Option<(TeamId, TeamId)> {
        Some((self.team1_id?, self.team2_id?))
    }

    pub fn team_on(&self, side: Side) -> Option<TeamId> {
        match side {
            Side::Team1 => self.team1_id,
            Side::Team2 => self.team2_id,
        }
    }

    // The side a team plays on, if it plays in this match.
    pub fn side_of(&self, team_id: TeamId) -> Option<Side> {
        if self.team1_id == Some(team_id) {
            return Some(Side::Team1);
        }
        if self.team2_id == Some(team_id) {
            return Some(Side::Team2);
        }
        return None;
    }

    pub fn loser_id(&self) -> Option<TeamId> {
        let winner_side = self.side_of(self.winner_id?)?;
        self.team_on(winner_side.other())
    }

    // Team pair regardless of home and away.
    pub fn unordered_pair(&self) -> (Option<TeamId>, Option<TeamId>) {
        match self.team1_id <= self.team2_id {
            true => (self.team1_id, self.team2_id),
            _ => (self.team2_id, self.team1_id),
        }
    }

    pub fn set_slot(&mut self, side: Side, team_id: Option<TeamId>) {
        match side {
            Side::Team1 => self.team1_id = team_id,
            Side::Team2 => self.team2_id = team_id,
        }
    }
}
