use crate::{error::Result, logic::{team::{Standings, Team}, types::{CompetitionId, Conn, TeamId}}};

// Read queries.
impl Team {
    // Teams of a competition in the order they were entered.
    pub async fn fetch_for_competition(conn: &mut Conn, comp_id: CompetitionId) -> Result<Vec<Self>> {
        let teams = sqlx::query_as(
            "SELECT * FROM Team
            WHERE comp_id = $1
            ORDER BY id ASC"
        ).bind(comp_id)
        .fetch_all(&mut *conn).await?;
        Ok(teams)
    }

    pub async fn fetch_ids(conn: &mut Conn, comp_id: CompetitionId) -> Result<Vec<TeamId>> {
        let ids = sqlx::query_scalar(
            "SELECT id FROM Team
            WHERE comp_id = $1
            ORDER BY id ASC"
        ).bind(comp_id)
        .fetch_all(&mut *conn).await?;
        Ok(ids)
    }

    pub async fn fetch_many(conn: &mut Conn, ids: &[TeamId]) -> Result<Vec<Self>> {
        let mut teams = Vec::with_capacity(ids.len());
        for id in ids {
            let team: Option<Self> = sqlx::query_as(
                "SELECT * FROM Team WHERE id = $1"
            ).bind(id)
            .fetch_optional(&mut *conn).await?;
            teams.extend(team);
        }
        Ok(teams)
    }
}

// Write queries.
impl Team {
    pub async fn save(&mut self, conn: &mut Conn) -> Result<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Team
            (comp_id, team_name, player1_id, player2_id, group_label)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id"
        ).bind(self.comp_id)
        .bind(self.name.as_str())
        .bind(self.player1_id)
        .bind(self.player2_id)
        .bind(self.group_label.as_deref())
        .fetch_one(&mut *conn).await?;
        Ok(())
    }

    pub async fn save_group_label(conn: &mut Conn, id: TeamId, label: Option<&str>) -> Result<()> {
        sqlx::query(
            "UPDATE Team SET group_label = $1 WHERE id = $2"
        ).bind(label)
        .bind(id)
        .execute(&mut *conn).await?;
        Ok(())
    }

    pub async fn clear_group_labels(conn: &mut Conn, comp_id: CompetitionId) -> Result<()> {
        sqlx::query(
            "UPDATE Team SET group_label = NULL WHERE comp_id = $1"
        ).bind(comp_id)
        .execute(&mut *conn).await?;
        Ok(())
    }

    // Zero the aggregates of every team in the competition.
    pub async fn reset_standings(conn: &mut Conn, comp_id: CompetitionId) -> Result<()> {
        sqlx::query(
            "UPDATE Team SET
            points = 0, played = 0, won = 0, lost = 0,
            sets_for = 0, sets_against = 0, games_for = 0, games_against = 0
            WHERE comp_id = $1"
        ).bind(comp_id)
        .execute(&mut *conn).await?;
        Ok(())
    }

    // Add a delta to a team's aggregates in place.
    pub async fn apply_delta(conn: &mut Conn, id: TeamId, delta: &Standings) -> Result<()> {
        sqlx::query(
            "UPDATE Team SET
            points = points + $1, played = played + $2,
            won = won + $3, lost = lost + $4,
            sets_for = sets_for + $5, sets_against = sets_against + $6,
            games_for = games_for + $7, games_against = games_against + $8
            WHERE id = $9"
        ).bind(delta.points)
        .bind(delta.played)
        .bind(delta.won)
        .bind(delta.lost)
        .bind(delta.sets_for)
        .bind(delta.sets_against)
        .bind(delta.games_for)
        .bind(delta.games_against)
        .bind(id)
        .execute(&mut *conn).await?;
        Ok(())
    }

    // Replace the stored aggregates with the ones on this struct.
    pub async fn overwrite_standings(&self, conn: &mut Conn) -> Result<()> {
        let s = &self.standings;
        sqlx::query(
            "UPDATE Team SET
            points = $1, played = $2, won = $3, lost = $4,
            sets_for = $5, sets_against = $6, games_for = $7, games_against = $8
            WHERE id = $9"
        ).bind(s.points)
        .bind(s.played)
        .bind(s.won)
        .bind(s.lost)
        .bind(s.sets_for)
        .bind(s.sets_against)
        .bind(s.games_for)
        .bind(s.games_against)
        .bind(self.id)
        .execute(&mut *conn).await?;
        Ok(())
    }
}
