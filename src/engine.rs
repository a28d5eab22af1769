// The operations callers of the competition engine use. Each write operation
// runs as exactly one database transaction.
use futures::TryStreamExt as _;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::EngineConfig,
    db,
    error::{EngineError, Result},
    logic::{
        competition::{Competition, Format, Status, bracket, ranking::{self, RankCriteria}, schedule_generator},
        game::{Game, Side},
        rating::{self, PlayerRating},
        standings::{self, LedgerChange, ResultWarning},
        team::{PointsRule, Team},
        types::{CompetitionId, Db, GameId, PlayerId},
    },
};

// What a result submission hands back.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct ResultOutcome {
    pub game: Game,
    pub updated_teams: Vec<Team>,
    pub warnings: Vec<ResultWarning>,
}

pub struct Engine {
    pub db: Db,
    pub config: EngineConfig,
}

// Basics.
impl Engine {
    pub fn build(db: Db, config: EngineConfig) -> Self {
        Self { db, config }
    }

    // Open the configured database and build the engine on top of it.
    pub async fn connect(config: EngineConfig) -> Result<Self> {
        let db = db::setup(&config).await?;
        Ok(Self::build(db, config))
    }

    fn points(&self) -> PointsRule {
        PointsRule {
            win: self.config.points_for_win,
            loss: self.config.points_for_loss,
        }
    }
}

// Setting up competitions.
impl Engine {
    pub async fn create_competition(&self, name: &str, format: Format, rounds: u32, group_size: u32) -> Result<Competition> {
        let mut comp = Competition::build(name, format, rounds, group_size);
        let mut conn = self.db.acquire().await?;
        comp.save(&mut conn).await?;
        Ok(comp)
    }

    pub async fn add_team(&self, comp_id: CompetitionId, name: &str, player1_id: Option<PlayerId>, player2_id: Option<PlayerId>) -> Result<Team> {
        let mut tx = self.db.begin().await?;
        Competition::bump_revision(&mut *tx, comp_id).await?;

        let mut team = Team::build(name, player1_id, player2_id);
        team.comp_id = comp_id;
        team.save(&mut *tx).await?;

        tx.commit().await?;
        Ok(team)
    }

    pub async fn set_status(&self, comp_id: CompetitionId, status: Status) -> Result<Competition> {
        let mut tx = self.db.begin().await?;
        Competition::bump_revision(&mut *tx, comp_id).await?;

        let mut comp = Competition::fetch(&mut *tx, comp_id).await?;
        comp.status = status;
        comp.save_status(&mut *tx).await?;

        tx.commit().await?;
        Ok(comp)
    }
}

// Competition engine operations.
impl Engine {
    // Throw away the competition's matches and standings and draw a new schedule.
    pub async fn generate_schedule<R: Rng + ?Sized>(&self, comp_id: CompetitionId, rng: &mut R) -> Result<Vec<Game>> {
        let now = std::time::Instant::now();
        let mut tx = self.db.begin().await?;
        Competition::bump_revision(&mut *tx, comp_id).await?;

        let comp = Competition::fetch(&mut *tx, comp_id).await?;
        let team_ids = Team::fetch_ids(&mut *tx, comp_id).await?;
        let group_size = self.config.group_size_or_default(comp.group_size);

        // Dropping the transaction on a validation error rolls back the revision bump as well.
        let mut schedule = schedule_generator::generate(&comp, &team_ids, group_size, rng)?;

        let removed = Game::delete_for_competition(&mut *tx, comp_id).await?;
        Team::reset_standings(&mut *tx, comp_id).await?;
        Team::clear_group_labels(&mut *tx, comp_id).await?;
        for (team_id, label) in schedule.group_labels.iter() {
            Team::save_group_label(&mut *tx, *team_id, Some(label.as_str())).await?;
        }
        Game::save_all(&mut *tx, comp_id, &mut schedule.games).await?;

        if comp.is_knockout() && self.config.propagate_byes {
            for game in schedule.games.iter().filter(|g| g.is_bye()) {
                let mut change = LedgerChange { new_winner: game.winner_id, ..Default::default() };
                bracket::propagate(&mut *tx, game, self.points(), &mut change).await?;
            }
            schedule.games = Game::fetch_for_competition(&mut *tx, comp_id).await?;
        }

        tx.commit().await?;

        info!(comp = comp_id, format = comp.format.as_str(), games = schedule.games.len(), removed,
            "generated schedule in {:.2?}", now.elapsed());
        return Ok(schedule.games);
    }

    // Same as `generate_schedule`, drawing from an OS-seeded generator.
    pub async fn generate_schedule_random(&self, comp_id: CompetitionId) -> Result<Vec<Game>> {
        let mut rng = StdRng::from_os_rng();
        self.generate_schedule(comp_id, &mut rng).await
    }

    // Set a match result, or clear it with None. Standings are reverted and re-credited,
    // and in knockouts the winner moves on to the next round.
    pub async fn set_match_result(&self, comp_id: CompetitionId, game_id: GameId, raw: Option<&str>) -> Result<ResultOutcome> {
        let now = std::time::Instant::now();
        let mut tx = self.db.begin().await?;
        Competition::bump_revision(&mut *tx, comp_id).await?;

        let mut game = Game::fetch(&mut *tx, game_id).await?;
        if game.comp_id != comp_id {
            return Err(EngineError::validation("El partido no pertenece a esta competición."));
        }
        let comp = Competition::fetch(&mut *tx, comp_id).await?;

        let mut change = standings::set_result(&mut *tx, &mut game, raw, self.points()).await?;
        if comp.is_knockout() {
            bracket::propagate(&mut *tx, &game, self.points(), &mut change).await?;
        }

        let updated_teams = Team::fetch_many(&mut *tx, &change.touched_teams).await?;
        tx.commit().await?;

        info!(comp = comp_id, game = game_id, result = ?game.result, winner = ?game.winner_id,
            "result saved in {:.2?}", now.elapsed());
        Ok(ResultOutcome {
            game,
            updated_teams,
            warnings: change.warnings,
        })
    }

    // New ratings for the four players of a finished match.
    pub fn rate_match(&self, team1: [PlayerRating; 2], team2: [PlayerRating; 2], winner: Side) -> [i32; 4] {
        rating::calculate_match_ratings(team1, team2, winner)
    }
}

// Reading and repairing standings.
impl Engine {
    pub async fn games(&self, comp_id: CompetitionId) -> Result<Vec<Game>> {
        let mut conn = self.db.acquire().await?;
        Competition::fetch(&mut conn, comp_id).await?;
        Game::fetch_for_competition(&mut conn, comp_id).await
    }

    pub async fn teams(&self, comp_id: CompetitionId) -> Result<Vec<Team>> {
        let mut conn = self.db.acquire().await?;
        Competition::fetch(&mut conn, comp_id).await?;
        Team::fetch_for_competition(&mut conn, comp_id).await
    }

    // Teams ranked best first, optionally limited to one group.
    pub async fn standings_table(&self, comp_id: CompetitionId, group: Option<&str>) -> Result<Vec<Team>> {
        self.standings_table_by(comp_id, group, &ranking::DEFAULT_CRITERIA).await
    }

    pub async fn standings_table_by(&self, comp_id: CompetitionId, group: Option<&str>, criteria: &[RankCriteria]) -> Result<Vec<Team>> {
        let mut teams = self.teams(comp_id).await?;
        if let Some(group) = group {
            teams.retain(|t| t.group_label.as_deref() == Some(group));
        }
        ranking::rank_teams(&mut teams, criteria);
        Ok(teams)
    }

    // Rebuild every team's aggregates from the decided matches.
    pub async fn recompute_standings(&self, comp_id: CompetitionId) -> Result<Vec<Team>> {
        let now = std::time::Instant::now();
        let mut tx = self.db.begin().await?;
        Competition::bump_revision(&mut *tx, comp_id).await?;

        let team_ids = Team::fetch_ids(&mut *tx, comp_id).await?;
        let mut decided = Vec::new();
        {
            let mut rows = Game::stream_decided(&mut *tx, comp_id);
            while let Some(game) = rows.try_next().await? {
                decided.push(game);
            }
        }

        let table = standings::recompute(&team_ids, &decided, self.points());
        let mut teams = Team::fetch_for_competition(&mut *tx, comp_id).await?;
        for team in teams.iter_mut() {
            team.standings = table.get(&team.id).copied().unwrap_or_default();
            team.overwrite_standings(&mut *tx).await?;
        }

        tx.commit().await?;
        info!(comp = comp_id, games = decided.len(), "recomputed standings in {:.2?}", now.elapsed());
        Ok(teams)
    }

    // Check that the stored aggregates match a fresh recomputation.
    pub async fn verify_standings(&self, comp_id: CompetitionId) -> Result<bool> {
        let teams = self.teams(comp_id).await?;
        let games = self.games(comp_id).await?;

        let team_ids: Vec<_> = teams.iter().map(|t| t.id).collect();
        let table = standings::recompute(&team_ids, &games, self.points());

        let mut consistent = true;
        for team in teams.iter() {
            let expected = table.get(&team.id).copied().unwrap_or_default();
            if team.standings != expected {
                warn!(comp = comp_id, team = team.id, stored = ?team.standings, ?expected, "standings drifted");
                consistent = false;
            }
        }
        Ok(consistent)
    }
}
