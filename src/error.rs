use thiserror::Error;

use crate::team::TeamId;

/// Problems with tournament input, caught before any match is simulated.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown team `{id}` referenced by {context}")]
    UnknownTeam { id: TeamId, context: String },

    #[error("Team `{id}` appears more than once")]
    DuplicateTeam { id: TeamId },

    #[error("Malformed historical result `{raw}` for team `{team}`")]
    MalformedHistoricalResult { team: TeamId, raw: String },

    #[error("Group `{group}` has {size} team(s); at least 2 are required")]
    GroupTooSmall { group: String, size: usize },

    #[error("Team `{id}` has a non-finite rating")]
    InvalidRating { id: TeamId },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures that abort a single simulation run.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Match {team1} vs {team2} still level after {attempts} attempts")]
    RetryExhausted {
        team1: TeamId,
        team2: TeamId,
        attempts: u32,
    },

    #[error("Cannot separate tied teams {teams:?} in group {group}")]
    TieResolutionExhausted { group: String, teams: Vec<TeamId> },

    #[error("Team `{0}` is not registered")]
    UnknownTeam(TeamId),

    #[error("Bracket needs {needed} teams but only {available} were ranked")]
    NotEnoughTeams { needed: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),
}

#[derive(Error, Debug)]
pub enum TourneyError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
