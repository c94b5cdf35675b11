use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::HashMap;

use crate::error::SimulationError;
use crate::team::TeamId;
use crate::tournament::{run_seeds, Tournament};

/// How often a team finished on each step of the podium.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedalOdds {
    pub team: TeamId,
    pub gold: f64,
    pub silver: f64,
    pub bronze: f64,
    /// Any medal.
    pub podium: f64,
    /// Wilson score interval for `gold`.
    pub gold_interval: (f64, f64),
}

/// Wilson score interval for `successes` out of `trials`.
///
/// `confidence` must lie strictly between 0 and 1.
pub fn wilson_interval(
    successes: usize,
    trials: usize,
    confidence: f64,
) -> Result<(f64, f64), SimulationError> {
    check_confidence(confidence)?;
    if trials == 0 {
        return Ok((0.0, 1.0));
    }
    let normal = Normal::new(0.0, 1.0).expect("standard normal parameters are valid");
    let z = normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);

    let n = trials as f64;
    let p = successes as f64 / n;
    let denom = 1.0 + z * z / n;
    let centre = (p + z * z / (2.0 * n)) / denom;
    let half = z * (p * (1.0 - p) / n + z * z / (4.0 * n * n)).sqrt() / denom;
    Ok(((centre - half).max(0.0), (centre + half).min(1.0)))
}

fn check_confidence(confidence: f64) -> Result<(), SimulationError> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfidence(confidence))
    }
}

/// Simulate the tournament `n_simulations` times in parallel and tally medals.
///
/// Per-run seeds come from one master generator so the table is reproducible
/// for a given `seed`. Results are sorted by gold, then podium frequency.
pub fn medal_odds(
    tournament: &Tournament,
    n_simulations: usize,
    seed: Option<u64>,
    confidence: f64,
) -> Result<Vec<MedalOdds>, SimulationError> {
    check_confidence(confidence)?;
    let podiums: Vec<[TeamId; 3]> = run_seeds(n_simulations, seed)
        .par_iter()
        .map(|&s| tournament.simulate(Some(s)).map(|o| o.bracket.medals))
        .collect::<Result<_, _>>()?;

    let mut counts: HashMap<TeamId, [usize; 3]> = tournament
        .input()
        .registry()
        .iter()
        .map(|t| (t.id.clone(), [0; 3]))
        .collect();
    for podium in &podiums {
        for (place, team) in podium.iter().enumerate() {
            if let Some(c) = counts.get_mut(team) {
                c[place] += 1;
            }
        }
    }

    let n = n_simulations.max(1) as f64;
    let mut odds: Vec<MedalOdds> = counts
        .into_iter()
        .map(|(team, [gold, silver, bronze])| -> Result<MedalOdds, SimulationError> {
            Ok(MedalOdds {
                team,
                gold: gold as f64 / n,
                silver: silver as f64 / n,
                bronze: bronze as f64 / n,
                podium: (gold + silver + bronze) as f64 / n,
                gold_interval: wilson_interval(gold, n_simulations, confidence)?,
            })
        })
        .collect::<Result<_, _>>()?;

    odds.sort_by(|a, b| {
        b.gold
            .total_cmp(&a.gold)
            .then(b.podium.total_cmp(&a.podium))
            .then_with(|| a.team.cmp(&b.team))
    });

    log::info!("medal odds from {} simulation(s)", n_simulations);
    Ok(odds)
}
