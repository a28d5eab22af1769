// Shared helpers for the engine integration tests.
#![allow(dead_code)]

use club_competition::{
    Engine, EngineConfig, db,
    logic::{competition::{Competition, Format}, game::Game, team::Team, types::TeamId},
};
use rand::{Rng, seq::IndexedRandom};

pub async fn engine() -> Engine {
    engine_with(EngineConfig::default()).await
}

pub async fn engine_with(config: EngineConfig) -> Engine {
    club_competition::logging::init();
    let db = db::setup_memory().await.expect("in-memory database");
    Engine::build(db, config)
}

pub async fn competition(engine: &Engine, format: Format, rounds: u32, group_size: u32, no_of_teams: usize) -> (Competition, Vec<Team>) {
    let comp = engine.create_competition("Liga de Otoño", format, rounds, group_size).await.unwrap();

    let mut teams = Vec::new();
    for i in 0..no_of_teams {
        let player = (i * 2 + 1) as u32;
        let team = engine.add_team(comp.id, &format!("Equipo {}", i + 1), Some(player), Some(player + 1)).await.unwrap();
        teams.push(team);
    }
    (comp, teams)
}

// A decisive score in two or three sets.
pub fn random_score<R: Rng>(rng: &mut R) -> String {
    const SETS: [(u32, u32); 7] = [(6, 0), (6, 1), (6, 2), (6, 3), (6, 4), (7, 5), (7, 6)];

    let team1_wins = rng.random_bool(0.5);
    let winners = match rng.random_bool(0.4) {
        true => vec![team1_wins, !team1_wins, team1_wins],
        _ => vec![team1_wins, team1_wins],
    };

    let mut sets = Vec::new();
    for team1_takes_set in winners {
        let (high, low) = *SETS.choose(rng).unwrap();
        match team1_takes_set {
            true => sets.push(format!("{high}-{low}")),
            _ => sets.push(format!("{low}-{high}")),
        }
    }
    sets.join(" ")
}

pub fn round(games: &[Game], round_number: u32) -> Vec<Game> {
    games.iter().filter(|g| g.round_number == round_number).cloned().collect()
}

pub fn team_ids(teams: &[Team]) -> Vec<TeamId> {
    teams.iter().map(|t| t.id).collect()
}
