use crate::config::RatingConfig;
use crate::data::ExhibitionResult;
use crate::team::TeamRegistry;
use crate::win_prob::{base_probability, expected_win_probability};
use std::collections::BTreeMap;

/// Fold one result into `target`'s form.
///
/// The margin is scaled by `0.5 + P(target wins)`. `include_form` selects
/// whether that probability uses current form or ratings only (exhibition
/// history has no tournament form yet).
pub fn adjust_form_by_match(
    teams: &mut TeamRegistry,
    cfg: &RatingConfig,
    target: &str,
    opponent: &str,
    target_points: u32,
    opponent_points: u32,
    include_form: bool,
) {
    let expectation = if include_form {
        expected_win_probability(teams, cfg, target, opponent)
    } else {
        base_probability(teams, cfg, target, opponent)
    };
    let weight = 0.5 + expectation;
    let diff = (target_points as f64 - opponent_points as f64) * weight;

    match teams.get_mut(target) {
        Some(team) => {
            team.form.record(diff);
            log::trace!(
                "form {} vs {} ({}:{}): {:+.2} -> avg {:.3}",
                target,
                opponent,
                target_points,
                opponent_points,
                diff,
                team.form.average
            );
        }
        None => log::debug!("form update skipped for unregistered team {target}"),
    }
}

/// Seed every team's form from its pre-tournament exhibition games.
pub fn seed_from_exhibitions(
    teams: &mut TeamRegistry,
    cfg: &RatingConfig,
    exhibitions: &BTreeMap<String, Vec<ExhibitionResult>>,
) {
    for (team, games) in exhibitions {
        for game in games {
            adjust_form_by_match(
                teams,
                cfg,
                team,
                &game.opponent,
                game.own_score,
                game.opponent_score,
                false,
            );
        }
    }
}
