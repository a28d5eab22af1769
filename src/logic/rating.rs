//! Elo ratings for doubles matches.
//!
//! Each player is updated against the average rating of the opposing pair,
//! with a K-factor that shrinks as the player gets more games behind them.
//! Partners can therefore move by different amounts after the same match.

use serde::{Deserialize, Serialize};

use crate::logic::game::Side;

/// Starting rating for a player with no history
pub const DEFAULT_RATING: i32 = 1500;

/// A player's rating going into a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub rating: i32,
    pub games_played: u32,
}

impl Default for PlayerRating {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            games_played: 0,
        }
    }
}

impl PlayerRating {
    pub fn new(rating: i32, games_played: u32) -> Self {
        Self { rating, games_played }
    }
}

/// Expected score of A against B, between 0 and 1
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

/// K-factor by experience: 32 under 30 games, 24 under 100, 16 after that
pub fn k_factor(games_played: u32) -> f64 {
    match games_played {
        0..=29 => 32.0,
        30..=99 => 24.0,
        _ => 16.0,
    }
}

/// Rating after a match, rounded to the nearest integer
pub fn new_rating(rating: i32, k: f64, actual: f64, expected: f64) -> i32 {
    (rating as f64 + k * (actual - expected)).round() as i32
}

/// Strength of a pair as seen by their opponents
pub fn team_rating(player1: i32, player2: i32) -> i32 {
    ((player1 + player2) as f64 / 2.0).round() as i32
}

fn updated(player: PlayerRating, opponents: i32, won: bool) -> i32 {
    let expected = expected_score(player.rating as f64, opponents as f64);
    let actual = if won { 1.0 } else { 0.0 };
    new_rating(player.rating, k_factor(player.games_played), actual, expected)
}

/// New ratings for all four players, in the order team 1 player 1, team 1 player 2,
/// team 2 player 1, team 2 player 2
pub fn calculate_match_ratings(team1: [PlayerRating; 2], team2: [PlayerRating; 2], winner: Side) -> [i32; 4] {
    let team1_rating = team_rating(team1[0].rating, team1[1].rating);
    let team2_rating = team_rating(team2[0].rating, team2[1].rating);
    let team1_won = winner == Side::Team1;

    [
        updated(team1[0], team2_rating, team1_won),
        updated(team1[1], team2_rating, team1_won),
        updated(team2[0], team1_rating, !team1_won),
        updated(team2[1], team1_rating, !team1_won),
    ]
}
