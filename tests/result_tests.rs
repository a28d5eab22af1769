mod common;

use std::collections::HashMap;

use club_competition::{
    EngineConfig, EngineError,
    logic::{
        competition::{Format, ranking::RankCriteria},
        game::{Side, score::Decision},
        rating::PlayerRating,
        standings::ResultWarning,
        team::Standings,
        types::{Tally, TeamId},
    },
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use common::{competition, engine, engine_with, random_score, round};

fn by_id(teams: &[club_competition::logic::team::Team]) -> HashMap<TeamId, Standings> {
    teams.iter().map(|t| (t.id, t.standings)).collect()
}

#[tokio::test]
async fn straight_sets_win() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 1, 0, 4).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(10)).await.unwrap();
    let game = &games[0];
    let (team1, team2) = game.teams().unwrap();

    let outcome = engine.set_match_result(comp.id, game.id, Some(" 6-3,  6-4 ")).await.unwrap();
    assert_eq!(outcome.game.result.as_deref(), Some("6-3 6-4"));
    assert_eq!(outcome.game.winner_id, Some(team1));
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.updated_teams.len(), 2);

    let table = by_id(&outcome.updated_teams);
    let winner = table[&team1];
    assert_eq!((winner.points, winner.played, winner.won, winner.lost), (2, 1, 1, 0));
    assert_eq!((winner.sets_for, winner.sets_against, winner.games_for, winner.games_against), (2, 0, 12, 7));

    let loser = table[&team2];
    assert_eq!((loser.points, loser.played, loser.won, loser.lost), (1, 1, 0, 1));
    assert_eq!((loser.sets_for, loser.sets_against, loser.games_for, loser.games_against), (0, 2, 7, 12));

    // The stored match matches what came back.
    let stored = engine.games(comp.id).await.unwrap();
    assert_eq!(stored.iter().find(|g| g.id == game.id), Some(&outcome.game));
}

#[tokio::test]
async fn resubmitting_changes_nothing() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 2, 0, 6).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(11)).await.unwrap();
    let mut rng = StdRng::seed_from_u64(22);

    // Two passes, so the second one also replaces earlier results.
    for game in games.iter().chain(games.iter()) {
        let score = random_score(&mut rng);

        let first = engine.set_match_result(comp.id, game.id, Some(score.as_str())).await.unwrap();
        let after_first = engine.teams(comp.id).await.unwrap();
        let second = engine.set_match_result(comp.id, game.id, Some(score.as_str())).await.unwrap();

        assert_eq!(first.game, second.game, "{score}");
        assert_eq!(first.warnings, second.warnings, "{score}");
        assert_eq!(after_first, engine.teams(comp.id).await.unwrap(), "{score}");
    }
    assert!(engine.verify_standings(comp.id).await.unwrap());
}

#[tokio::test]
async fn edits_and_clears_keep_the_books_balanced() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 2, 0, 5).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(12)).await.unwrap();
    let mut rng = StdRng::seed_from_u64(13);

    for _ in 0..60 {
        let game = games.choose(&mut rng).unwrap();
        let score = random_score(&mut rng);
        let raw = match rng.random_bool(0.2) {
            true => None,
            _ => Some(score.as_str()),
        };
        engine.set_match_result(comp.id, game.id, raw).await.unwrap();
    }

    let stored = engine.games(comp.id).await.unwrap();
    let decided = stored.iter().filter(|g| g.winner_id.is_some()).count() as Tally;
    let teams = engine.teams(comp.id).await.unwrap();

    let total = teams.iter().fold(Standings::default(), |mut acc, t| {
        acc.update(&t.standings);
        acc
    });
    assert_eq!(total.won, decided);
    assert_eq!(total.lost, decided);
    assert_eq!(total.played, 2 * decided);
    assert_eq!(total.sets_for, total.sets_against);
    assert_eq!(total.games_for, total.games_against);
    assert_eq!(total.points, 3 * decided);

    assert!(engine.verify_standings(comp.id).await.unwrap());
}

#[tokio::test]
async fn clearing_restores_the_previous_standings() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 1, 0, 4).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(14)).await.unwrap();

    engine.set_match_result(comp.id, games[0].id, Some("6-2 6-2")).await.unwrap();
    let before = engine.teams(comp.id).await.unwrap();

    engine.set_match_result(comp.id, games[1].id, Some("2-6 6-4 3-6")).await.unwrap();
    let cleared = engine.set_match_result(comp.id, games[1].id, None).await.unwrap();
    assert_eq!(cleared.game.result, None);
    assert_eq!(cleared.game.winner_id, None);

    assert_eq!(engine.teams(comp.id).await.unwrap(), before);

    // Blank text clears as well.
    engine.set_match_result(comp.id, games[0].id, Some("   ")).await.unwrap();
    assert!(engine.teams(comp.id).await.unwrap().iter().all(|t| t.standings.is_zero()));
}

#[tokio::test]
async fn level_sets_are_decided_by_games() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 1, 0, 2).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(15)).await.unwrap();
    let (_, team2) = games[0].teams().unwrap();

    let outcome = engine.set_match_result(comp.id, games[0].id, Some("6-4 2-6")).await.unwrap();
    assert_eq!(outcome.game.winner_id, Some(team2));
    assert_eq!(outcome.warnings, vec![ResultWarning::TiedSets { sets: 1, decided_by: Decision::Games }]);
}

#[tokio::test]
async fn malformed_sets_are_dropped() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 1, 0, 2).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(16)).await.unwrap();
    let (team1, _) = games[0].teams().unwrap();

    let outcome = engine.set_match_result(comp.id, games[0].id, Some("6-3 abc 6-4")).await.unwrap();
    assert_eq!(outcome.warnings, vec![ResultWarning::DroppedTokens { tokens: vec!["abc".to_string()] }]);

    // Nothing countable is a level score, decided by the last tie-break.
    let outcome = engine.set_match_result(comp.id, games[0].id, Some("6/3 x")).await.unwrap();
    assert_eq!(outcome.game.result.as_deref(), Some("6/3 x"));
    assert_eq!(outcome.game.winner_id, Some(team1));
    assert_eq!(outcome.warnings, vec![
        ResultWarning::TiedSets { sets: 0, decided_by: Decision::Default },
        ResultWarning::DroppedTokens { tokens: vec!["6/3".to_string(), "x".to_string()] },
    ]);

    let winner = outcome.updated_teams.iter().find(|t| t.id == team1).unwrap();
    assert_eq!((winner.standings.won, winner.standings.sets_for, winner.standings.games_for), (1, 0, 0));

    // Oversized sets are dropped instead of overflowing the totals.
    let outcome = engine.set_match_result(comp.id, games[0].id, Some("2147483647-0 1-0")).await.unwrap();
    assert_eq!(outcome.warnings, vec![ResultWarning::DroppedTokens { tokens: vec!["2147483647-0".to_string()] }]);
    assert!(engine.verify_standings(comp.id).await.unwrap());
}

#[tokio::test]
async fn bye_results_cannot_be_edited() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::Knockout, 1, 0, 3).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(23)).await.unwrap();
    let bye = games.iter().find(|g| g.is_bye()).unwrap();

    for raw in [None, Some("6-0 6-0")] {
        let err = engine.set_match_result(comp.id, bye.id, raw).await.unwrap_err();
        assert_eq!(err.to_string(), "El resultado de un partido de descanso no se puede modificar.");
    }

    let stored = engine.games(comp.id).await.unwrap();
    assert_eq!(stored.iter().find(|g| g.id == bye.id), Some(bye));
}

#[tokio::test]
async fn match_from_another_competition() {
    let engine = engine().await;
    let (first, _) = competition(&engine, Format::League, 1, 0, 2).await;
    let (second, _) = competition(&engine, Format::League, 1, 0, 2).await;
    let games = engine.generate_schedule(first.id, &mut StdRng::seed_from_u64(17)).await.unwrap();

    let err = engine.set_match_result(second.id, games[0].id, Some("6-0 6-0")).await.unwrap_err();
    assert_eq!(err.to_string(), "El partido no pertenece a esta competición.");
    assert!(engine.games(first.id).await.unwrap()[0].result.is_none());

    let err = engine.set_match_result(first.id, 999, Some("6-0 6-0")).await.unwrap_err();
    assert_eq!(err.to_string(), "No se ha encontrado el partido.");
}

#[tokio::test]
async fn winners_move_through_the_bracket() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::Knockout, 1, 0, 4).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(18)).await.unwrap();

    let semis = round(&games, 1);
    assert_eq!(semis.len(), 2);
    assert!(semis.iter().all(|g| !g.is_bye() && g.round_name == "Semifinales"));
    let final_id = round(&games, 2)[0].id;
    let (a1, a2) = semis[0].teams().unwrap();
    let (b1, b2) = semis[1].teams().unwrap();

    // The final cannot be played before both teams are known.
    let err = engine.set_match_result(comp.id, final_id, Some("6-0 6-0")).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    engine.set_match_result(comp.id, semis[0].id, Some("6-1 6-1")).await.unwrap();
    engine.set_match_result(comp.id, semis[1].id, Some("1-6 1-6")).await.unwrap();
    let final_game = round(&engine.games(comp.id).await.unwrap(), 2).remove(0);
    assert_eq!(final_game.teams(), Some((a1, b2)));

    // A changed winner replaces the old one in the same slot.
    engine.set_match_result(comp.id, semis[0].id, Some("1-6 1-6")).await.unwrap();
    let final_game = round(&engine.games(comp.id).await.unwrap(), 2).remove(0);
    assert_eq!(final_game.teams(), Some((a2, b2)));

    // Clearing takes the winner back out.
    engine.set_match_result(comp.id, semis[1].id, None).await.unwrap();
    let final_game = round(&engine.games(comp.id).await.unwrap(), 2).remove(0);
    assert_eq!((final_game.team1_id, final_game.team2_id), (Some(a2), None));

    engine.set_match_result(comp.id, semis[1].id, Some("6-4 6-4")).await.unwrap();
    let final_game = round(&engine.games(comp.id).await.unwrap(), 2).remove(0);
    assert_eq!(final_game.teams(), Some((a2, b1)));
    let outcome = engine.set_match_result(comp.id, final_id, Some("6-4 6-4")).await.unwrap();
    assert_eq!(outcome.game.winner_id, Some(a2));
    assert_eq!(engine.games(comp.id).await.unwrap().len(), 3);

    // Editing a semifinal after the final was played voids the final.
    let outcome = engine.set_match_result(comp.id, semis[1].id, Some("4-6 4-6")).await.unwrap();
    assert!(outcome.warnings.contains(&ResultWarning::DownstreamDecided { game_id: final_id }));
    assert!(outcome.updated_teams.iter().any(|t| t.id == b1));
    let final_game = round(&engine.games(comp.id).await.unwrap(), 2).remove(0);
    assert_eq!(final_game.teams(), Some((a2, b2)));
    assert_eq!((final_game.result, final_game.winner_id), (None, None));

    let teams = engine.teams(comp.id).await.unwrap();
    let played = |id: TeamId| teams.iter().find(|t| t.id == id).unwrap().standings.played;
    assert_eq!(played(a2), 1);
    assert_eq!(played(b1), 1);
    assert_eq!(played(b2), 1);
    assert!(engine.verify_standings(comp.id).await.unwrap());
}

#[tokio::test]
async fn voided_results_cascade_to_the_final() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::Knockout, 1, 0, 8).await;
    engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(24)).await.unwrap();

    // Team 1 wins every match, round by round.
    for round_number in 1..=3 {
        for game in round(&engine.games(comp.id).await.unwrap(), round_number) {
            engine.set_match_result(comp.id, game.id, Some("6-0 6-0")).await.unwrap();
        }
    }
    let games = engine.games(comp.id).await.unwrap();
    let quarter = round(&games, 1).remove(0);
    let semi_id = round(&games, 2)[0].id;
    let final_id = round(&games, 3)[0].id;

    let outcome = engine.set_match_result(comp.id, quarter.id, Some("0-6 0-6")).await.unwrap();
    assert!(outcome.warnings.contains(&ResultWarning::DownstreamDecided { game_id: semi_id }));
    assert!(outcome.warnings.contains(&ResultWarning::DownstreamDecided { game_id: final_id }));

    let stored = engine.games(comp.id).await.unwrap();
    let semi = stored.iter().find(|g| g.id == semi_id).unwrap();
    assert_eq!(semi.team1_id, quarter.team2_id);
    assert_eq!(semi.result, None);

    let final_game = stored.iter().find(|g| g.id == final_id).unwrap();
    assert_eq!((final_game.team1_id, final_game.result.clone()), (None, None));
    assert!(final_game.team2_id.is_some());

    // Every recorded winner plays in its match, and wins add up to played matches.
    let decided: Vec<_> = stored.iter().filter(|g| g.winner_id.is_some()).collect();
    assert!(decided.iter().all(|g| g.side_of(g.winner_id.unwrap()).is_some()));
    let teams = engine.teams(comp.id).await.unwrap();
    let won: Tally = teams.iter().map(|t| t.standings.won).sum();
    assert_eq!(won, decided.len() as Tally);
    assert!(engine.verify_standings(comp.id).await.unwrap());
}

#[tokio::test]
async fn bye_winner_meets_the_real_winner() {
    let config = EngineConfig { propagate_byes: true, ..Default::default() };
    let engine = engine_with(config).await;
    let (comp, _) = competition(&engine, Format::Knockout, 1, 0, 3).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(19)).await.unwrap();

    let first = round(&games, 1);
    let bye = first.iter().find(|g| g.is_bye()).unwrap();
    let real = first.iter().find(|g| !g.is_bye()).unwrap();

    let outcome = engine.set_match_result(comp.id, real.id, Some("7-6 7-6")).await.unwrap();
    let winner = outcome.game.winner_id.unwrap();

    let final_game = round(&engine.games(comp.id).await.unwrap(), 2).remove(0);
    let mut finalists = [final_game.team1_id.unwrap(), final_game.team2_id.unwrap()];
    finalists.sort();
    let mut expected = [bye.winner_id.unwrap(), winner];
    expected.sort();
    assert_eq!(finalists, expected);
}

#[tokio::test]
async fn recompute_repairs_a_points_change() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 1, 0, 4).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(20)).await.unwrap();
    for game in games.iter().take(4) {
        engine.set_match_result(comp.id, game.id, Some("6-3 3-6 6-2")).await.unwrap();
    }

    // Three points a win from here on.
    let config = EngineConfig { points_for_win: 3, points_for_loss: 0, ..Default::default() };
    let engine = club_competition::Engine::build(engine.db.clone(), config);
    assert!(!engine.verify_standings(comp.id).await.unwrap());

    let teams = engine.recompute_standings(comp.id).await.unwrap();
    let total_points: Tally = teams.iter().map(|t| t.standings.points).sum();
    assert_eq!(total_points, 4 * 3);
    assert!(engine.verify_standings(comp.id).await.unwrap());
}

#[tokio::test]
async fn table_is_ranked() {
    let engine = engine().await;
    let (comp, _) = competition(&engine, Format::League, 1, 0, 3).await;
    let games = engine.generate_schedule(comp.id, &mut StdRng::seed_from_u64(21)).await.unwrap();

    // Team 1 of the first match wins everything it plays.
    let (champion, _) = games[0].teams().unwrap();
    for game in &games {
        let raw = match game.side_of(champion) {
            Some(Side::Team1) => "6-0 6-0",
            Some(Side::Team2) => "0-6 0-6",
            None => "6-4 6-4",
        };
        engine.set_match_result(comp.id, game.id, Some(raw)).await.unwrap();
    }

    let table = engine.standings_table(comp.id, None).await.unwrap();
    assert_eq!(table[0].id, champion);
    assert_eq!(table[0].standings.won, 2);
    assert!(table.windows(2).all(|w| w[0].standings.points >= w[1].standings.points));

    let by_losses = engine.standings_table_by(comp.id, None, &[RankCriteria::Losses, RankCriteria::Name]).await.unwrap();
    assert_eq!(by_losses[0].id, champion);
}

#[tokio::test]
async fn ratings_for_a_doubles_match() {
    let engine = engine().await;
    let fresh = PlayerRating::default();
    let ratings = engine.rate_match([fresh, fresh], [fresh, fresh], Side::Team1);
    assert_eq!(ratings, [1516, 1516, 1484, 1484]);
}
