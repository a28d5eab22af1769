// Single elimination brackets.
use rand::{Rng, seq::{SliceRandom, index}};

use crate::logic::{game::Game, types::{TeamId, convert}};

// Smallest power of two that fits every team.
pub fn bracket_size(no_of_teams: usize) -> usize {
    no_of_teams.max(1).next_power_of_two()
}

// Get the name of a knockout round based on how many teams enter it.
pub fn round_name(teams_in_round: usize) -> String {
    match teams_in_round {
        2 => "Final".to_string(),
        4 => "Semifinales".to_string(),
        8 => "Cuartos de Final".to_string(),
        16 => "Octavos de Final".to_string(),
        32 => "Ronda de 32".to_string(),
        n => format!("Ronda de {n}"),
    }
}

// Draw a bracket for the teams.
// The first round is filled in random order, with byes resolved on the spot.
// Later rounds are created empty and filled as winners advance.
pub fn generate<R: Rng + ?Sized>(teams: &[TeamId], rng: &mut R) -> Vec<Game> {
    let size = bracket_size(teams.len());
    let byes = size - teams.len();
    let first_round_games = size / 2;

    let slots = draw_first_round(teams, byes, first_round_games, rng);

    let mut games = Vec::with_capacity(size - 1);
    let first_name = round_name(size);
    for (position, pair) in slots.chunks(2).enumerate() {
        let (team1, team2) = (pair[0], pair[1]);
        let position = convert::to_u32(position);
        let game = match team1.is_some() && team2.is_some() {
            true => Game::build(1, &first_name, position, team1, team2),
            _ => Game::build_bye(&first_name, position, team1, team2),
        };
        games.push(game);
    }

    let mut round_number = 1;
    let mut teams_in_round = size / 2;
    while teams_in_round >= 2 {
        round_number += 1;
        let name = round_name(teams_in_round);
        for position in 0..teams_in_round / 2 {
            games.push(Game::build(round_number, &name, convert::to_u32(position), None, None));
        }
        teams_in_round /= 2;
    }

    return games;
}

// Put the teams in a random order and hand out the byes so that every
// first round match has at least one team in it.
fn draw_first_round<R: Rng + ?Sized>(teams: &[TeamId], byes: usize, no_of_games: usize, rng: &mut R) -> Vec<Option<TeamId>> {
    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);

    let mut bye_games = vec![false; no_of_games];
    for i in index::sample(rng, no_of_games, byes) {
        bye_games[i] = true;
    }

    let mut drawn = shuffled.into_iter();
    let mut slots = Vec::with_capacity(no_of_games * 2);
    for has_bye in bye_games {
        match has_bye {
            true => {
                let team = drawn.next();
                // The empty side is random too.
                match rng.random_bool(0.5) {
                    true => slots.extend([team, None]),
                    _ => slots.extend([None, team]),
                }
            }
            _ => slots.extend([drawn.next(), drawn.next()]),
        }
    }

    return slots;
}
