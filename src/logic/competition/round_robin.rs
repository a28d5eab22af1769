// Round robin fixtures with the circle method.
use crate::logic::{game::Game, types::{TeamId, convert}};

// Pair up teams for every round. Each round is a list of (team1, team2) index pairs into `teams`.
// An odd team count gets a placeholder that sits out each round in turn.
pub fn circle_rounds(no_of_teams: usize) -> Vec<Vec<(usize, usize)>> {
    if no_of_teams < 2 {
        return Vec::new();
    }

    // None stands for the bye.
    let mut slots: Vec<Option<usize>> = (0..no_of_teams).map(Some).collect();
    if no_of_teams % 2 == 1 {
        slots.push(None);
    }

    let n = slots.len();
    let fixed = slots[0];
    let mut rotating = slots[1..].to_vec();

    let mut rounds = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        let mut pairs = Vec::with_capacity(n / 2);
        push_pair(&mut pairs, fixed, rotating[0]);
        for j in 1..n / 2 {
            push_pair(&mut pairs, rotating[j], rotating[n - 1 - j]);
        }
        rounds.push(pairs);

        // Last goes first.
        rotating.rotate_right(1);
    }

    return rounds;
}

fn push_pair(pairs: &mut Vec<(usize, usize)>, a: Option<usize>, b: Option<usize>) {
    if let (Some(a), Some(b)) = (a, b) {
        pairs.push((a, b));
    }
}

// Generate the matches of a round robin between `teams`.
// With two rounds the return fixtures mirror the first half with home and away swapped.
pub fn generate(teams: &[TeamId], rounds: u32, name_prefix: &str) -> Vec<Game> {
    let circle = circle_rounds(teams.len());
    let round_length = circle.len();

    let mut games = Vec::new();
    for (r, pairs) in circle.iter().enumerate() {
        let round_number = convert::to_u32(r + 1);
        for (position, (a, b)) in pairs.iter().enumerate() {
            games.push(Game::build(
                round_number,
                &round_name(name_prefix, round_number),
                convert::to_u32(position),
                Some(teams[*a]),
                Some(teams[*b]),
            ));
        }
    }

    if rounds >= 2 {
        let first_leg = games.clone();
        for game in first_leg {
            let round_number = game.round_number + convert::to_u32(round_length);
            games.push(Game::build(
                round_number,
                &round_name(name_prefix, round_number),
                game.bracket_position,
                game.team2_id,
                game.team1_id,
            ));
        }
    }

    return games;
}

fn round_name(prefix: &str, round_number: u32) -> String {
    format!("{prefix}Jornada {round_number}")
}
