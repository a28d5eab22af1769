use futures::{Stream, TryStreamExt as _};

use crate::{error::{EngineError, Result}, logic::{game::{Game, Side}, types::{CompetitionId, Conn, GameId, TeamId}}};

// Read queries.
impl Game {
    pub async fn fetch(conn: &mut Conn, id: GameId) -> Result<Self> {
        sqlx::query_as(
            "SELECT * FROM Game WHERE id = $1"
        ).bind(id)
        .fetch_optional(&mut *conn).await?
        .ok_or(EngineError::NotFound("el partido"))
    }

    // All matches of a competition, round by round in bracket order.
    pub async fn fetch_for_competition(conn: &mut Conn, comp_id: CompetitionId) -> Result<Vec<Self>> {
        let games = sqlx::query_as(
            "SELECT * FROM Game
            WHERE comp_id = $1
            ORDER BY round_number ASC, bracket_position ASC, id ASC"
        ).bind(comp_id)
        .fetch_all(&mut *conn).await?;
        Ok(games)
    }

    // Matches of one round in bracket order.
    pub async fn fetch_round(conn: &mut Conn, comp_id: CompetitionId, round_number: u32) -> Result<Vec<Self>> {
        let games = sqlx::query_as(
            "SELECT * FROM Game
            WHERE comp_id = $1 AND round_number = $2
            ORDER BY bracket_position ASC, id ASC"
        ).bind(comp_id)
        .bind(round_number)
        .fetch_all(&mut *conn).await?;
        Ok(games)
    }

    // Stream the matches that currently have a result.
    pub fn stream_decided(conn: &mut Conn, comp_id: CompetitionId) -> impl Stream<Item = Result<Self>> + Unpin + '_ {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM Game
            WHERE comp_id = $1 AND result IS NOT NULL
            ORDER BY id ASC"
        ).bind(comp_id)
        .fetch(conn)
        .map_err(EngineError::from)
    }
}

// Write queries.
impl Game {
    pub async fn save(&mut self, conn: &mut Conn, comp_id: CompetitionId) -> Result<()> {
        self.comp_id = comp_id;
        self.id = sqlx::query_scalar(
            "INSERT INTO Game
            (comp_id, team1_id, team2_id, round_number, round_name, bracket_position, result, winner_id, match_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id"
        ).bind(self.comp_id)
        .bind(self.team1_id)
        .bind(self.team2_id)
        .bind(self.round_number)
        .bind(self.round_name.as_str())
        .bind(self.bracket_position)
        .bind(self.result.as_deref())
        .bind(self.winner_id)
        .bind(self.match_date)
        .fetch_one(&mut *conn).await?;
        Ok(())
    }

    pub async fn save_all(conn: &mut Conn, comp_id: CompetitionId, games: &mut [Self]) -> Result<()> {
        for game in games.iter_mut() {
            game.save(conn, comp_id).await?;
        }
        Ok(())
    }

    pub async fn delete_for_competition(conn: &mut Conn, comp_id: CompetitionId) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM Game WHERE comp_id = $1"
        ).bind(comp_id)
        .execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    // Save the result and winner of this match.
    pub async fn save_result(&self, conn: &mut Conn) -> Result<()> {
        sqlx::query(
            "UPDATE Game SET result = $1, winner_id = $2
            WHERE id = $3"
        ).bind(self.result.as_deref())
        .bind(self.winner_id)
        .bind(self.id)
        .execute(&mut *conn).await?;
        Ok(())
    }

    // Fill or clear one team slot of a match.
    pub async fn save_slot(conn: &mut Conn, id: GameId, side: Side, team_id: Option<TeamId>) -> Result<()> {
        let query = match side {
            Side::Team1 => "UPDATE Game SET team1_id = $1 WHERE id = $2",
            Side::Team2 => "UPDATE Game SET team2_id = $1 WHERE id = $2",
        };

        sqlx::query(query)
            .bind(team_id)
            .bind(id)
            .execute(&mut *conn).await?;
        Ok(())
    }
}
