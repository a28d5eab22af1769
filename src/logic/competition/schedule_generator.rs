// Builds the full set of matches for a competition from its format and teams.
use rand::Rng;

use crate::{error::{EngineError, Result}, logic::{competition::{Competition, Format, group_stage, knockout, round_robin}, game::Game, types::TeamId}};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub games: Vec<Game>,
    // Group letters to persist, only for grouped formats.
    pub group_labels: Vec<(TeamId, String)>,
}

// Generate the schedule, or a validation error if the competition cannot be scheduled.
// Nothing here touches the database, so a failure leaves everything as it was.
pub fn generate<R: Rng + ?Sized>(comp: &Competition, teams: &[TeamId], group_size: u32, rng: &mut R) -> Result<Schedule> {
    if !matches!(comp.rounds, 1 | 2) {
        return Err(EngineError::validation("El número de vueltas debe ser 1 o 2."));
    }

    match &comp.format {
        Format::League => {
            check_team_count(teams)?;
            Ok(Schedule {
                games: round_robin::generate(teams, comp.rounds, ""),
                ..Default::default()
            })
        }
        Format::Knockout => {
            check_team_count(teams)?;
            Ok(Schedule {
                games: knockout::generate(teams, rng),
                ..Default::default()
            })
        }
        Format::GroupAndKnockout => {
            if group_size < 2 {
                return Err(EngineError::validation("Los grupos deben tener al menos 2 equipos."));
            }
            if teams.len() < group_size as usize {
                return Err(EngineError::validation(format!("Se necesitan al menos {group_size} equipos para la fase de grupos.")));
            }

            if group_stage::group_count(teams.len(), group_size as usize) > group_stage::MAX_GROUPS {
                return Err(EngineError::validation(format!("No se pueden formar más de {} grupos.", group_stage::MAX_GROUPS)));
            }

            let draw = group_stage::generate(teams, group_size as usize, comp.rounds, rng);
            Ok(Schedule {
                games: draw.games,
                group_labels: draw.labels,
            })
        }
        Format::Other(_) => Err(EngineError::validation("Formato de competición no soportado.")),
    }
}

fn check_team_count(teams: &[TeamId]) -> Result<()> {
    match teams.len() < 2 {
        true => Err(EngineError::validation("Se necesitan al menos 2 equipos.")),
        _ => Ok(()),
    }
}
