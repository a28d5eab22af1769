// Teams entered in a competition and their running standings.
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::logic::{game::{Side, score::Score}, types::{CompetitionId, PlayerId, Tally, TeamId}};

#[derive(Debug, Clone, Default, PartialEq)]
#[derive(Serialize, Deserialize)]
#[derive(FromRow)]
pub struct Team {
    pub id: TeamId,
    pub comp_id: CompetitionId,
    #[sqlx(rename = "team_name")]
    pub name: String,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    // Single uppercase letter, only for grouped formats.
    pub group_label: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub standings: Standings,
}

impl Team {
    pub fn build(name: &str, player1_id: Option<PlayerId>, player2_id: Option<PlayerId>) -> Self {
        Self {
            name: name.to_string(),
            player1_id,
            player2_id,

            ..Default::default()
        }
    }
}

// Points awarded for a decided match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsRule {
    pub win: Tally,
    pub loss: Tally,
}

impl Default for PointsRule {
    fn default() -> Self {
        Self { win: 2, loss: 1 }
    }
}

// Aggregates of a team. The same shape doubles as the contribution of a single match,
// which is what gets added or taken away when a result changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[derive(FromRow)]
pub struct Standings {
    pub points: Tally,
    pub played: Tally,
    pub won: Tally,
    pub lost: Tally,
    pub sets_for: Tally,
    pub sets_against: Tally,
    pub games_for: Tally,
    pub games_against: Tally,
}

// Basics.
impl Standings {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    pub fn set_difference(&self) -> Tally {
        self.sets_for - self.sets_against
    }

    pub fn game_difference(&self) -> Tally {
        self.games_for - self.games_against
    }

    // Add another set of standings (usually a single match contribution) to this one.
    pub fn update(&mut self, other: &Standings) {
        self.points += other.points;
        self.played += other.played;
        self.won += other.won;
        self.lost += other.lost;
        self.sets_for += other.sets_for;
        self.sets_against += other.sets_against;
        self.games_for += other.games_for;
        self.games_against += other.games_against;
    }

    // The same contribution with every field negated, used to take a result back.
    pub fn reversed(&self) -> Self {
        Self {
            points: -self.points,
            played: -self.played,
            won: -self.won,
            lost: -self.lost,
            sets_for: -self.sets_for,
            sets_against: -self.sets_against,
            games_for: -self.games_for,
            games_against: -self.games_against,
        }
    }
}

// Functional.
impl Standings {
    // Get the contributions of a decided match, as (winner, loser).
    pub fn from_score(score: &Score, winner: Side, points: PointsRule) -> (Self, Self) {
        let loser = winner.other();

        let winner_data = Self {
            points: points.win,
            played: 1,
            won: 1,
            lost: 0,
            sets_for: score.sets_of(winner),
            sets_against: score.sets_of(loser),
            games_for: score.games_of(winner),
            games_against: score.games_of(loser),
        };

        let loser_data = Self {
            points: points.loss,
            played: 1,
            won: 0,
            lost: 1,
            sets_for: score.sets_of(loser),
            sets_against: score.sets_of(winner),
            games_for: score.games_of(loser),
            games_against: score.games_of(winner),
        };

        return (winner_data, loser_data);
    }
}
