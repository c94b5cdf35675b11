use rand::Rng;

use crate::config::RatingConfig;
use crate::team::TeamRegistry;

/// Probability of `target` beating `opponent` from ratings alone.
///
/// Ratings are ranking positions, so the better-ranked (lower) team is
/// favoured by `gap / rating_divisor`. If either team is not registered the
/// matchup is treated as even.
pub fn base_probability(
    teams: &TeamRegistry,
    cfg: &RatingConfig,
    target: &str,
    opponent: &str,
) -> f64 {
    match (teams.get(target), teams.get(opponent)) {
        (Some(t), Some(o)) => 0.5 + (o.rating - t.rating) / cfg.rating_divisor,
        _ => 0.5,
    }
}

/// Base probability shifted by the difference in form, clamped to [0, 1].
pub fn expected_win_probability(
    teams: &TeamRegistry,
    cfg: &RatingConfig,
    target: &str,
    opponent: &str,
) -> f64 {
    let form = |id: &str| teams.get(id).map_or(0.0, |t| t.form.average);
    let raw = base_probability(teams, cfg, target, opponent)
        + (form(target) - form(opponent)) / cfg.form_divisor;
    raw.clamp(0.0, 1.0)
}

/// Expected probability plus a uniform per-match noise term, clamped to [0, 1].
pub fn sampled_win_probability<R: Rng + ?Sized>(
    teams: &TeamRegistry,
    cfg: &RatingConfig,
    target: &str,
    opponent: &str,
    rng: &mut R,
) -> f64 {
    let form = |id: &str| teams.get(id).map_or(0.0, |t| t.form.average);
    let noise = rng.gen_range(cfg.noise_min..=cfg.noise_max);
    let raw = base_probability(teams, cfg, target, opponent)
        + (form(target) - form(opponent)) / cfg.form_divisor
        + noise;
    raw.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Team;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn registry(teams: &[(&str, f64)]) -> TeamRegistry {
        teams.iter().map(|&(id, rating)| Team::new(id, id, rating)).collect()
    }

    #[test]
    fn equal_teams_50_50() {
        let teams = registry(&[("A", 10.0), ("B", 10.0)]);
        let cfg = RatingConfig::default();

        let ab = expected_win_probability(&teams, &cfg, "A", "B");
        let ba = expected_win_probability(&teams, &cfg, "B", "A");
        assert!((ab - 0.5).abs() < 1e-12);
        assert!((ba - 0.5).abs() < 1e-12);
    }

    #[test]
    fn better_ranked_team_favored() {
        let teams = registry(&[("USA", 1.0), ("PUR", 23.0)]);
        let cfg = RatingConfig::default();

        let prob = base_probability(&teams, &cfg, "USA", "PUR");
        assert!((prob - 0.7).abs() < 1e-12);
        assert!((base_probability(&teams, &cfg, "PUR", "USA") - 0.3).abs() < 1e-12);
    }

    #[test]
    fn unregistered_team_is_neutral() {
        let teams = registry(&[("A", 1.0)]);
        let cfg = RatingConfig::default();
        assert_eq!(base_probability(&teams, &cfg, "A", "ZZZ"), 0.5);
        assert_eq!(base_probability(&teams, &cfg, "ZZZ", "A"), 0.5);
    }

    #[test]
    fn form_shifts_probability() {
        let mut teams = registry(&[("A", 10.0), ("B", 10.0)]);
        teams.get_mut("A").unwrap().form.record(15.0);
        let cfg = RatingConfig::default();

        let prob = expected_win_probability(&teams, &cfg, "A", "B");
        assert!((prob - 0.6).abs() < 1e-12);
    }

    #[test]
    fn expected_probability_is_clamped() {
        let teams = registry(&[("A", 1.0), ("B", 500.0)]);
        let cfg = RatingConfig::default();
        assert_eq!(expected_win_probability(&teams, &cfg, "A", "B"), 1.0);
        assert_eq!(expected_win_probability(&teams, &cfg, "B", "A"), 0.0);
    }

    proptest! {
        #[test]
        fn sampled_probability_stays_in_noise_band(
            r1 in 1.0f64..40.0,
            r2 in 1.0f64..40.0,
            seed in any::<u64>(),
        ) {
            let teams = registry(&[("A", r1), ("B", r2)]);
            let cfg = RatingConfig::default();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let expected = expected_win_probability(&teams, &cfg, "A", "B");
            let sampled = sampled_win_probability(&teams, &cfg, "A", "B", &mut rng);

            prop_assert!((0.0..=1.0).contains(&sampled));
            prop_assert!(sampled >= (expected + cfg.noise_min).max(0.0) - 1e-12);
            prop_assert!(sampled <= (expected + cfg.noise_max).min(1.0) + 1e-12);
        }
    }
}
