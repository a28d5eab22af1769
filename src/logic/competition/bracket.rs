// Moving knockout winners into the next round.
//
// Every match knows its `bracket_position` within its round. The winner of position `p`
// in round `r` plays in round `r + 1` at position `p / 2`, as team 1 when `p` is even
// and team 2 when it is odd. Both placing a winner and taking one back use this address.
use serde::Serialize;
use tracing::{debug, warn};

use crate::{error::Result, logic::{game::{Game, Side}, standings::{self, LedgerChange, ResultWarning}, team::{PointsRule, Team}, types::{Conn, TeamId}}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Serialize)]
pub struct SlotAddress {
    pub round_number: u32,
    pub bracket_position: u32,
    pub side: Side,
}

// Get the slot the winner of this match moves into.
pub fn next_slot(game: &Game) -> SlotAddress {
    SlotAddress {
        round_number: game.round_number + 1,
        bracket_position: game.bracket_position / 2,
        side: match game.bracket_position % 2 {
            0 => Side::Team1,
            _ => Side::Team2,
        },
    }
}

// Index and side of the match in `round` where the team currently sits.
pub fn find_team(round: &[Game], team_id: TeamId) -> Option<(usize, Side)> {
    round.iter()
        .enumerate()
        .find_map(|(i, game)| game.side_of(team_id).map(|side| (i, side)))
}

// Where the previous winner should be taken out of `next_round`.
// The addressed slot is preferred; if someone edited the slot by hand, look the team up instead.
pub fn revert_target(next_round: &[Game], address: SlotAddress, previous_winner: TeamId) -> Option<(usize, Side)> {
    let addressed = next_round.iter().position(|g| {
        g.bracket_position == address.bracket_position && g.team_on(address.side) == Some(previous_winner)
    });

    match addressed {
        Some(i) => Some((i, address.side)),
        None => find_team(next_round, previous_winner),
    }
}

// A match whose winner changed, with its old and new winner, still to be carried forward.
type Pending = (Game, Option<TeamId>, Option<TeamId>);

// Update the bracket after the winner of `game` changed from `change.previous_winner`
// to `change.new_winner`. A later match that loses one of its teams this way has its
// result voided, and its own old winner is taken back out of the round after it.
pub async fn propagate(conn: &mut Conn, game: &Game, points: PointsRule, change: &mut LedgerChange) -> Result<()> {
    let mut pending: Vec<Pending> = vec![(game.clone(), change.previous_winner, change.new_winner)];

    while let Some((game, previous_winner, new_winner)) = pending.pop() {
        let address = next_slot(&game);
        let mut next_round = Game::fetch_round(conn, game.comp_id, address.round_number).await?;
        if next_round.is_empty() {
            continue;
        }

        // Take back the old winner, unless the same team won again.
        if let Some(previous) = previous_winner.filter(|p| Some(*p) != new_winner) {
            if let Some((i, side)) = revert_target(&next_round, address, previous) {
                pending.extend(fill_slot(conn, &mut next_round[i], side, None, points, change).await?);
            }
        }

        if let Some(winner) = new_winner {
            match next_round.iter().position(|g| g.bracket_position == address.bracket_position) {
                Some(i) => pending.extend(fill_slot(conn, &mut next_round[i], address.side, Some(winner), points, change).await?),
                None => warn!(game = game.id, round = address.round_number, position = address.bracket_position, "no match at the next round position"),
            }
        }
    }

    return Ok(());
}

// Put a team into a slot, or empty it. If the match was already played its standings
// are taken back and its result cleared, and the voided match is handed back.
async fn fill_slot(conn: &mut Conn, target: &mut Game, side: Side, team_id: Option<TeamId>, points: PointsRule, change: &mut LedgerChange) -> Result<Option<Pending>> {
    if target.team_on(side) == team_id {
        return Ok(None);
    }

    let mut voided = None;
    if target.has_result() {
        warn!(game = target.id, ?side, team = ?team_id, "voiding the result of a match that lost a team");
        change.warnings.push(ResultWarning::DownstreamDecided { game_id: target.id });
        for (id, contribution) in standings::contributions(target, points) {
            Team::apply_delta(conn, id, &contribution.reversed()).await?;
            change.touch(id);
        }

        let previous_winner = target.winner_id;
        target.result = None;
        target.winner_id = None;
        target.save_result(conn).await?;
        voided = Some((target.clone(), previous_winner, None));
    }

    target.set_slot(side, team_id);
    Game::save_slot(conn, target.id, side, team_id).await?;

    debug!(game = target.id, ?side, team = ?team_id, "bracket slot updated");
    Ok(voided)
}
