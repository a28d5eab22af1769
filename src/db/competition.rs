use sqlx::{FromRow, Row, sqlite::SqliteRow};

use crate::{error::{EngineError, Result}, logic::{competition::{Competition, Format}, types::{CompetitionId, Conn}}};

impl FromRow<'_, SqliteRow> for Competition {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("comp_name")?,
            format: Format::from(row.try_get::<String, _>("format")?),
            rounds: row.try_get("rounds")?,
            group_size: row.try_get("group_size")?,
            status: row.try_get("status")?,
            revision: row.try_get("revision")?,
        })
    }
}

// Read queries.
impl Competition {
    pub async fn fetch(conn: &mut Conn, id: CompetitionId) -> Result<Self> {
        sqlx::query_as(
            "SELECT * FROM Competition WHERE id = $1"
        ).bind(id)
        .fetch_optional(&mut *conn).await?
        .ok_or(EngineError::NotFound("la competición"))
    }
}

// Write queries.
impl Competition {
    pub async fn save(&mut self, conn: &mut Conn) -> Result<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Competition
            (comp_name, format, rounds, group_size, status, revision)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(self.format.as_str())
        .bind(self.rounds)
        .bind(self.group_size)
        .bind(self.status)
        .bind(self.revision)
        .fetch_one(&mut *conn).await?;
        Ok(())
    }

    // Increment the revision. Run first in a write transaction so that the
    // write lock is taken before anything is read.
    pub async fn bump_revision(conn: &mut Conn, id: CompetitionId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE Competition SET revision = revision + 1
            WHERE id = $1"
        ).bind(id)
        .execute(&mut *conn).await?;

        match result.rows_affected() {
            0 => Err(EngineError::NotFound("la competición")),
            _ => Ok(()),
        }
    }

    pub async fn save_status(&self, conn: &mut Conn) -> Result<()> {
        sqlx::query(
            "UPDATE Competition SET status = $1 WHERE id = $2"
        ).bind(self.status)
        .bind(self.id)
        .execute(&mut *conn).await?;
        Ok(())
    }
}
