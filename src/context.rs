use rand::Rng;

use crate::config::Config;
use crate::error::SimulationError;
use crate::team::TeamRegistry;

/// Mutable state owned by exactly one simulation run: the teams, the
/// parameters and the single random source every draw comes from.
pub struct SimulationContext<R: Rng> {
    pub teams: TeamRegistry,
    pub config: Config,
    pub rng: R,
}

impl<R: Rng> SimulationContext<R> {
    /// Fails if `config` does not pass [`Config::validate`].
    pub fn new(teams: TeamRegistry, config: Config, rng: R) -> Result<Self, SimulationError> {
        config
            .validate()
            .map_err(|e| SimulationError::InvalidConfig(e.to_string()))?;
        Ok(SimulationContext { teams, config, rng })
    }

    /// Hand back the registry once the run is over.
    pub fn into_teams(self) -> TeamRegistry {
        self.teams
    }
}
