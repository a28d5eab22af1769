// The standings ledger: every change to a match result goes through here so that
// team aggregates always equal the sum of what the decided matches contribute.
use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{error::{EngineError, Result}, logic::{game::{Game, score::{self, Decision}}, team::{PointsRule, Standings, Team}, types::{Conn, GameId, Tally, TeamId}}};

// Conditions worth telling the caller about, even though the result was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize)]
pub enum ResultWarning {
    // Both sides won the same number of sets. The winner was picked by `decided_by`.
    TiedSets { sets: Tally, decided_by: Decision },
    // Parts of the score that were not a valid set and were ignored.
    DroppedTokens { tokens: Vec<String> },
    // A team slot changed in a later knockout match that already has a result.
    DownstreamDecided { game_id: GameId },
}

// What a result change did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerChange {
    pub previous_winner: Option<TeamId>,
    pub new_winner: Option<TeamId>,
    pub touched_teams: Vec<TeamId>,
    pub warnings: Vec<ResultWarning>,
}

impl LedgerChange {
    // Note a team whose standings were written.
    pub fn touch(&mut self, team_id: TeamId) {
        if !self.touched_teams.contains(&team_id) {
            self.touched_teams.push(team_id);
        }
    }
}

// Get what a match currently adds to its teams' standings, as (team, contribution) pairs.
// Undecided matches and byes add nothing.
pub fn contributions(game: &Game, points: PointsRule) -> Vec<(TeamId, Standings)> {
    if game.is_bye() {
        return Vec::new();
    }

    let (Some(winner_id), Some(loser_id)) = (game.winner_id, game.loser_id()) else {
        return Vec::new();
    };
    let Some(winner_side) = game.side_of(winner_id) else {
        return Vec::new();
    };

    let parsed = score::parse(game.result.as_deref());
    let (winner_data, loser_data) = Standings::from_score(&parsed, winner_side, points);
    return vec![(winner_id, winner_data), (loser_id, loser_data)];
}

// Set or clear the result of a match: take back what the old result contributed,
// then credit the new one. The match row is updated last.
// Everything runs on the given connection, which should hold an open transaction.
pub async fn set_result(conn: &mut Conn, game: &mut Game, raw: Option<&str>, points: PointsRule) -> Result<LedgerChange> {
    let parsed = score::parse(raw);

    // Validate before writing anything.
    if game.is_bye() {
        return Err(EngineError::validation("El resultado de un partido de descanso no se puede modificar."));
    }
    if !parsed.is_empty() && game.teams().is_none() {
        return Err(EngineError::validation("El partido todavía no tiene ambos equipos asignados."));
    }

    let mut change = LedgerChange {
        previous_winner: game.winner_id,
        ..Default::default()
    };

    for (team_id, contribution) in contributions(game, points) {
        Team::apply_delta(conn, team_id, &contribution.reversed()).await?;
        change.touch(team_id);
    }

    match parsed.is_empty() {
        true => {
            game.result = None;
            game.winner_id = None;
        }
        _ => {
            let (side, decision) = parsed.winner();
            if parsed.sets_tied() {
                warn!(game = game.id, result = %parsed.sanitized, ?decision, "tied sets, winner picked by tie-break");
                change.warnings.push(ResultWarning::TiedSets { sets: parsed.team1_sets, decided_by: decision });
            }
            if !parsed.dropped.is_empty() {
                warn!(game = game.id, tokens = ?parsed.dropped, "ignored malformed set tokens");
                change.warnings.push(ResultWarning::DroppedTokens { tokens: parsed.dropped.clone() });
            }

            game.result = Some(parsed.sanitized.clone());
            game.winner_id = game.team_on(side);

            for (team_id, contribution) in contributions(game, points) {
                Team::apply_delta(conn, team_id, &contribution).await?;
                change.touch(team_id);
            }
        }
    }

    game.save_result(conn).await?;
    change.new_winner = game.winner_id;

    debug!(game = game.id, result = ?game.result, winner = ?game.winner_id, "result saved");
    return Ok(change);
}

// Rebuild every team's standings from scratch out of the decided matches.
pub fn recompute(teams: &[TeamId], games: &[Game], points: PointsRule) -> HashMap<TeamId, Standings> {
    let mut table: HashMap<TeamId, Standings> = teams.iter().map(|id| (*id, Standings::default())).collect();

    for game in games {
        for (team_id, contribution) in contributions(game, points) {
            table.entry(team_id).or_default().update(&contribution);
        }
    }

    return table;
}
