//! Tunable parameters for one tournament simulation.
//!
//! Defaults come from `constants.rs`. `Config::from_env` layers a handful of
//! `TOURNEY_*` environment overrides on top for batch runs.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BRACKET_SIZE, DISPARITY_MAX, DISPARITY_MIN, FORM_DIVISOR, MAX_REPLAYS, NOISE_MAX, NOISE_MIN,
    RATING_DIVISOR, SCORE_CEILING, SCORE_FLOOR, SCORE_JITTER,
};
use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub rating: RatingConfig,
    pub scoring: ScoringConfig,
    pub knockout: KnockoutConfig,
    /// Seed for the run's generator; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

/// Win probability model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    pub rating_divisor: f64,
    pub form_divisor: f64,
    pub noise_min: f64,
    pub noise_max: f64,
}

/// Score generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub floor: u32,
    pub ceiling: u32,
    /// Upper bound of the random amount added to the floor and taken off the ceiling.
    pub jitter: u32,
    pub disparity_min: f64,
    pub disparity_max: f64,
    /// Draw attempts per match before giving up on a level score.
    pub max_replays: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockoutConfig {
    /// Number of ranked teams entering the bracket. Power of two, at least 4.
    pub bracket_size: usize,
}

impl Default for RatingConfig {
    fn default() -> Self {
        RatingConfig {
            rating_divisor: RATING_DIVISOR,
            form_divisor: FORM_DIVISOR,
            noise_min: NOISE_MIN,
            noise_max: NOISE_MAX,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            floor: SCORE_FLOOR,
            ceiling: SCORE_CEILING,
            jitter: SCORE_JITTER,
            disparity_min: DISPARITY_MIN,
            disparity_max: DISPARITY_MAX,
            max_replays: MAX_REPLAYS,
        }
    }
}

impl Default for KnockoutConfig {
    fn default() -> Self {
        KnockoutConfig {
            bracket_size: BRACKET_SIZE,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rating: RatingConfig::default(),
            scoring: ScoringConfig::default(),
            knockout: KnockoutConfig::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Default config with environment overrides applied:
    ///
    ///   - TOURNEY_SEED          (u64)
    ///   - TOURNEY_MAX_REPLAYS   (u32)
    ///   - TOURNEY_BRACKET_SIZE  (usize)
    ///
    /// Any variable that fails to parse is ignored with a warning.
    pub fn from_env() -> Self {
        use std::env;

        let mut cfg = Config::default();

        if let Ok(raw) = env::var("TOURNEY_SEED") {
            match raw.parse::<u64>() {
                Ok(v) => {
                    cfg.seed = Some(v);
                    log::info!("[config] TOURNEY_SEED = {v} (overrode default)");
                }
                Err(_) => {
                    log::warn!("[config] could not parse TOURNEY_SEED = {raw:?} as u64; using entropy");
                }
            }
        }

        if let Ok(raw) = env::var("TOURNEY_MAX_REPLAYS") {
            match raw.parse::<u32>() {
                Ok(v) => {
                    cfg.scoring.max_replays = v;
                    log::info!("[config] TOURNEY_MAX_REPLAYS = {v} (overrode default)");
                }
                Err(_) => {
                    log::warn!(
                        "[config] could not parse TOURNEY_MAX_REPLAYS = {:?} as u32; using default {}",
                        raw,
                        cfg.scoring.max_replays
                    );
                }
            }
        }

        if let Ok(raw) = env::var("TOURNEY_BRACKET_SIZE") {
            match raw.parse::<usize>() {
                Ok(v) => {
                    cfg.knockout.bracket_size = v;
                    log::info!("[config] TOURNEY_BRACKET_SIZE = {v} (overrode default)");
                }
                Err(_) => {
                    log::warn!(
                        "[config] could not parse TOURNEY_BRACKET_SIZE = {:?} as usize; using default {}",
                        raw,
                        cfg.knockout.bracket_size
                    );
                }
            }
        }

        cfg
    }

    /// Same config with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject parameter combinations the simulator cannot run with.
    pub fn validate(&self) -> Result<(), LoadError> {
        let rating = &self.rating;
        if !(rating.rating_divisor.is_finite() && rating.rating_divisor > 0.0) {
            return Err(LoadError::InvalidConfig(format!(
                "rating_divisor must be positive, got {}",
                rating.rating_divisor
            )));
        }
        if !(rating.form_divisor.is_finite() && rating.form_divisor > 0.0) {
            return Err(LoadError::InvalidConfig(format!(
                "form_divisor must be positive, got {}",
                rating.form_divisor
            )));
        }
        if !(rating.noise_min <= rating.noise_max) {
            return Err(LoadError::InvalidConfig(format!(
                "noise range [{}, {}] is empty",
                rating.noise_min, rating.noise_max
            )));
        }

        let scoring = &self.scoring;
        let narrowest_floor = scoring.floor.saturating_add(scoring.jitter);
        if narrowest_floor >= scoring.ceiling.saturating_sub(scoring.jitter) {
            return Err(LoadError::InvalidConfig(format!(
                "score window {}..{} collapses with jitter {}",
                scoring.floor, scoring.ceiling, scoring.jitter
            )));
        }
        if !(scoring.disparity_min > 0.0 && scoring.disparity_min <= scoring.disparity_max) {
            return Err(LoadError::InvalidConfig(format!(
                "disparity range [{}, {}] is invalid",
                scoring.disparity_min, scoring.disparity_max
            )));
        }
        if scoring.max_replays == 0 {
            return Err(LoadError::InvalidConfig("max_replays must be at least 1".into()));
        }

        let size = self.knockout.bracket_size;
        if size < 4 || !size.is_power_of_two() {
            return Err(LoadError::InvalidConfig(format!(
                "bracket_size must be a power of two of at least 4, got {size}"
            )));
        }

        Ok(())
    }
}
