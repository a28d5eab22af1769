// Competition engine of the club management service: schedule generation for leagues,
// knockouts and group stages, set-score results, running standings and player ratings.
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod logic;

pub use config::EngineConfig;
pub use engine::{Engine, ResultOutcome};
pub use error::{EngineError, Result};
