// Parsing free-text set scores such as "6-3 6-4" or "6-3, 4-6, 10-8".
use serde::Serialize;

use crate::logic::{game::Side, types::Tally};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[derive(Serialize)]
pub struct Score {
    pub team1_sets: Tally,
    pub team2_sets: Tally,
    pub team1_games: Tally,
    pub team2_games: Tally,
    // Cleaned up input, stored as the match result.
    pub sanitized: String,
    // Tokens that did not look like a set and were left out of the counts.
    pub dropped: Vec<String>,
}

// How the winner of a score was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Serialize)]
pub enum Decision {
    Sets,
    // Sets were level, more games won.
    Games,
    // Sets and games were level, team 1 was given the match.
    Default,
}

// Parse a raw score. None or blank input gives an empty score.
pub fn parse(raw: Option<&str>) -> Score {
    let mut score = Score::default();
    let Some(raw) = raw else { return score; };

    let sanitized = sanitize(raw);
    for token in sanitized.split(' ').filter(|t| !t.is_empty()) {
        let counted = match parse_set(token) {
            Some((games1, games2)) => score.add_set(games1, games2),
            None => false,
        };
        if !counted {
            score.dropped.push(token.to_string());
        }
    }

    score.sanitized = sanitized;
    return score;
}

// Commas become spaces and runs of whitespace collapse into one space.
pub fn sanitize(raw: &str) -> String {
    raw.replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Most games one side can take in a single set.
pub const MAX_SET_GAMES: Tally = 999;

// A set is exactly two integers joined by a dash, neither above MAX_SET_GAMES.
fn parse_set(token: &str) -> Option<(Tally, Tally)> {
    let mut parts = token.split('-');
    let games1 = parts.next()?.parse::<Tally>().ok()?;
    let games2 = parts.next()?.parse::<Tally>().ok()?;

    if parts.next().is_some() || games1 > MAX_SET_GAMES || games2 > MAX_SET_GAMES {
        return None;
    }
    Some((games1, games2))
}

impl Score {
    // Count a set. Returns false and counts nothing if the game totals would overflow.
    fn add_set(&mut self, games1: Tally, games2: Tally) -> bool {
        let team1_games = self.team1_games.checked_add(games1);
        let team2_games = self.team2_games.checked_add(games2);
        let (Some(team1_games), Some(team2_games)) = (team1_games, team2_games) else {
            return false;
        };
        self.team1_games = team1_games;
        self.team2_games = team2_games;

        if games1 > games2 {
            self.team1_sets += 1;
        }
        else if games2 > games1 {
            self.team2_sets += 1;
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.sanitized.is_empty()
    }

    // Number of sets that were actually counted.
    pub fn counted_sets(&self) -> usize {
        self.sanitized.split(' ').filter(|t| !t.is_empty()).count() - self.dropped.len()
    }

    pub fn sets_tied(&self) -> bool {
        self.team1_sets == self.team2_sets
    }

    // The side with more sets. Level sets fall back to games, then to team 1.
    pub fn winner(&self) -> (Side, Decision) {
        if self.team1_sets != self.team2_sets {
            let side = match self.team1_sets > self.team2_sets {
                true => Side::Team1,
                _ => Side::Team2,
            };
            return (side, Decision::Sets);
        }

        if self.team1_games != self.team2_games {
            let side = match self.team1_games > self.team2_games {
                true => Side::Team1,
                _ => Side::Team2,
            };
            return (side, Decision::Games);
        }

        return (Side::Team1, Decision::Default);
    }

    pub fn sets_of(&self, side: Side) -> Tally {
        match side {
            Side::Team1 => self.team1_sets,
            Side::Team2 => self.team2_sets,
        }
    }

    pub fn games_of(&self, side: Side) -> Tally {
        match side {
            Side::Team1 => self.team1_games,
            Side::Team2 => self.team2_games,
        }
    }
}
