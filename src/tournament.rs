use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::bracket::{play_knockout, Bracket};
use crate::config::Config;
use crate::context::SimulationContext;
use crate::data::TournamentInput;
use crate::error::{LoadError, SimulationError, TourneyError};
use crate::form::seed_from_exhibitions;
use crate::seeding::{assign_seeds, Seeding};
use crate::standings::{
    play_group_stage, resolve_standings, standing, GroupRound, GroupStanding,
};
use crate::team::TeamRegistry;

/// Validated input plus parameters; every simulation starts from scratch.
#[derive(Clone, Debug)]
pub struct Tournament {
    input: TournamentInput,
    config: Config,
}

/// Everything one run produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentOutcome {
    pub group_rounds: Vec<GroupRound>,
    pub standings: Vec<GroupStanding>,
    pub seeding: Seeding,
    pub bracket: Bracket,
    /// Teams as they ended the run, form and group stats included.
    pub teams: TeamRegistry,
}

impl TournamentOutcome {
    pub fn medals(&self) -> &[String; 3] {
        &self.bracket.medals
    }
}

impl Tournament {
    pub fn new(input: TournamentInput, config: Config) -> Result<Self, LoadError> {
        config.validate()?;
        if input.team_count() < config.knockout.bracket_size {
            return Err(LoadError::InvalidConfig(format!(
                "bracket_size {} exceeds the {} teams entered",
                config.knockout.bracket_size,
                input.team_count()
            )));
        }
        Ok(Tournament { input, config })
    }

    pub fn input(&self) -> &TournamentInput {
        &self.input
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run once. `seed` falls back to the configured seed, then to entropy.
    pub fn simulate(&self, seed: Option<u64>) -> Result<TournamentOutcome, SimulationError> {
        let rng = match seed.or(self.config.seed) {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        self.simulate_with_rng(rng)
    }

    /// Run once drawing every random number from `rng`.
    pub fn simulate_with_rng<R: Rng>(
        &self,
        rng: R,
    ) -> Result<TournamentOutcome, SimulationError> {
        let mut ctx = SimulationContext::new(self.input.registry(), self.config.clone(), rng)?;

        seed_from_exhibitions(&mut ctx.teams, &ctx.config.rating, self.input.exhibitions());

        let mut groups = self.input.group_layout();
        log::info!("group stage: {} group(s), {} team(s)", groups.len(), ctx.teams.len());
        let group_rounds = play_group_stage(&mut ctx, &groups)?;

        for group in &mut groups {
            resolve_standings(&ctx.teams, group)?;
        }
        let standings = groups.iter().map(|g| standing(&ctx.teams, g)).collect();

        let seeding = assign_seeds(&ctx.teams, &groups, ctx.config.knockout.bracket_size)?;
        let bracket = play_knockout(&mut ctx, &seeding.hats)?;

        Ok(TournamentOutcome {
            group_rounds,
            standings,
            seeding,
            bracket,
            teams: ctx.into_teams(),
        })
    }

    /// Run `n_simulations` times from seeds drawn off one master generator.
    pub fn run_simulations(
        &self,
        n_simulations: usize,
        seed: Option<u64>,
    ) -> Result<Vec<TournamentOutcome>, SimulationError> {
        run_seeds(n_simulations, seed)
            .into_iter()
            .map(|s| self.simulate(Some(s)))
            .collect()
    }
}

/// Load both JSON documents and run once.
pub fn simulate_json(
    groups: &str,
    exhibitions: &str,
    config: Config,
    seed: Option<u64>,
) -> Result<TournamentOutcome, TourneyError> {
    let input = TournamentInput::from_json(groups, exhibitions)?;
    let outcome = Tournament::new(input, config)?.simulate(seed)?;
    Ok(outcome)
}

/// Per-run seeds derived from one master seed (or entropy).
pub(crate) fn run_seeds(n: usize, seed: Option<u64>) -> Vec<u64> {
    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    (0..n).map(|_| rng.gen::<u64>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TeamRecord;
    use std::collections::BTreeMap;

    fn input() -> TournamentInput {
        let record = |id: &str, rating: f64| TeamRecord {
            id: id.to_string(),
            name: id.to_string(),
            rating,
        };
        let mut groups = BTreeMap::new();
        groups.insert(
            "A".to_string(),
            vec![record("CAN", 7.0), record("AUS", 5.0), record("GRE", 14.0), record("ESP", 2.0)],
        );
        groups.insert(
            "B".to_string(),
            vec![record("GER", 3.0), record("FRA", 9.0), record("BRA", 12.0), record("JPN", 26.0)],
        );
        groups.insert(
            "C".to_string(),
            vec![record("SRB", 4.0), record("USA", 1.0), record("SSD", 34.0), record("PUR", 16.0)],
        );
        TournamentInput::new(groups, BTreeMap::new()).unwrap()
    }

    #[test]
    fn olympic_format_runs() {
        let tournament = Tournament::new(input(), Config::default()).unwrap();
        let outcome = tournament.simulate(Some(2024)).unwrap();

        assert_eq!(outcome.group_rounds.len(), 3);
        assert_eq!(outcome.standings.len(), 3);
        assert_eq!(outcome.seeding.pots.len(), 3);
        assert_eq!(outcome.seeding.ranking.len(), 9);
        assert_eq!(outcome.seeding.hats.len(), 4);
        assert_eq!(outcome.seeding.hats[0].label, "D");
        assert_eq!(outcome.bracket.draw.len(), 4);
        assert_eq!(outcome.bracket.rounds.len(), 2);
    }

    #[test]
    fn same_seed_same_outcome() {
        let tournament = Tournament::new(input(), Config::default()).unwrap();
        let a = tournament.simulate(Some(7)).unwrap();
        let b = tournament.simulate(Some(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn configured_seed_is_used() {
        let tournament = Tournament::new(input(), Config::default().with_seed(5)).unwrap();
        let a = tournament.simulate(None).unwrap();
        let b = tournament.simulate(Some(5)).unwrap();
        assert_eq!(a.medals(), b.medals());
    }

    #[test]
    fn runs_are_independent() {
        let tournament = Tournament::new(input(), Config::default()).unwrap();
        let outcomes = tournament.run_simulations(4, Some(1)).unwrap();

        assert_eq!(outcomes.len(), 4);
        for outcome in &outcomes {
            // every run starts from unplayed teams
            assert!(outcome.teams.iter().all(|t| t.stats.played() == 3));
        }
    }

    #[test]
    fn json_errors_surface_as_load_errors() {
        let err = simulate_json("{", "{}", Config::default(), Some(1)).unwrap_err();
        assert!(matches!(err, TourneyError::Load(LoadError::Json(_))));
    }

    #[test]
    fn bracket_larger_than_field_rejected() {
        let mut config = Config::default();
        config.knockout.bracket_size = 16;
        assert!(matches!(
            Tournament::new(input(), config),
            Err(LoadError::InvalidConfig(_))
        ));
    }
}
