// Functions for ordering teams in a standings table.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::logic::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub enum RankCriteria {
    Points,
    SetDifference,
    GameDifference,
    SetsWon,
    GamesWon,
    Wins,
    Losses,     // Lower is better.
    // Alphabetical, used as the last resort so that the order is always stable.
    Name,
}

pub const DEFAULT_CRITERIA: [RankCriteria; 5] = [
    RankCriteria::Points,
    RankCriteria::SetDifference,
    RankCriteria::GameDifference,
    RankCriteria::SetsWon,
    RankCriteria::Name,
];

type CmpFunc = fn (&Team, &Team) -> Ordering;

fn compare_points(a: &Team, b: &Team) -> Ordering {
    b.standings.points.cmp(&a.standings.points)
}

fn compare_set_difference(a: &Team, b: &Team) -> Ordering {
    b.standings.set_difference().cmp(&a.standings.set_difference())
}

fn compare_game_difference(a: &Team, b: &Team) -> Ordering {
    b.standings.game_difference().cmp(&a.standings.game_difference())
}

fn compare_sets_won(a: &Team, b: &Team) -> Ordering {
    b.standings.sets_for.cmp(&a.standings.sets_for)
}

fn compare_games_won(a: &Team, b: &Team) -> Ordering {
    b.standings.games_for.cmp(&a.standings.games_for)
}

fn compare_wins(a: &Team, b: &Team) -> Ordering {
    b.standings.won.cmp(&a.standings.won)
}

fn compare_losses(a: &Team, b: &Team) -> Ordering {
    a.standings.lost.cmp(&b.standings.lost)
}

fn compare_name(a: &Team, b: &Team) -> Ordering {
    a.name.cmp(&b.name)
}

impl RankCriteria {
    fn sort_function(self) -> CmpFunc {
        match self {
            Self::Points => compare_points,
            Self::SetDifference => compare_set_difference,
            Self::GameDifference => compare_game_difference,
            Self::SetsWon => compare_sets_won,
            Self::GamesWon => compare_games_won,
            Self::Wins => compare_wins,
            Self::Losses => compare_losses,
            Self::Name => compare_name,
        }
    }
}

// Sort the teams from best to worst, applying the criteria in order until one separates them.
pub fn rank_teams(teams: &mut [Team], criteria: &[RankCriteria]) {
    let functions: Vec<CmpFunc> = criteria.iter().map(|c| c.sort_function()).collect();

    teams.sort_by(|a, b| {
        functions.iter()
            .map(|f| f(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}
