//! Tourney Core - group-stage plus knockout tournament simulation.
//!
//! Teams play a round robin inside their groups, are ranked with head-to-head
//! tie-breaks, seeded into pots and hats, and drawn into a single-elimination
//! bracket with a third-place game. Every run owns its state and one seeded
//! random source, so runs are reproducible and can be repeated in parallel.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod context;
pub mod data;
pub mod error;
pub mod form;
pub mod game;
pub mod monte_carlo;
pub mod schedule;
pub mod seeding;
pub mod standings;
pub mod team;
pub mod tiebreak;
pub mod tournament;
pub mod win_prob;

pub use bracket::{
    draw_matchups, pair_next_round, play_knockout, Bracket, BracketMatchup, KnockoutMatch,
};
pub use config::{Config, KnockoutConfig, RatingConfig, ScoringConfig};
pub use context::SimulationContext;
pub use data::{ExhibitionResult, RawExhibition, TeamRecord, TournamentInput};
pub use error::{LoadError, SimulationError, TourneyError};
pub use form::{adjust_form_by_match, seed_from_exhibitions};
pub use game::{play_match, MatchResult};
pub use monte_carlo::{medal_odds, wilson_interval, MedalOdds};
pub use schedule::round_robin;
pub use seeding::{assign_seeds, Hat, Pot, Seeding};
pub use standings::{
    play_group_stage, resolve_standings, GroupRound, GroupStanding, StandingRow,
};
pub use team::{Group, Team, TeamId, TeamRegistry, TeamStats};
pub use tiebreak::{rank_group, TieBreakError};
pub use tournament::{simulate_json, Tournament, TournamentOutcome};
pub use win_prob::{base_probability, expected_win_probability, sampled_win_probability};
