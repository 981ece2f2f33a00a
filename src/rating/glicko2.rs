use std::f64::consts::{LN_10, PI};

use log::debug;

use super::types::{MatchOutcome, MatchResult, PlayerRating};
use crate::config::settings::GlickoSettings;

// Glicko-2 per http://www.glicko.net/glicko/glicko2.pdf, evaluated directly
// on the 0-3000 rating scale rather than through the mu/phi transform.
// Equivalent at these constants.
const Q: f64 = LN_10 / 400.0;

// Below this derivative magnitude the Newton step would blow up; the solver
// stops and keeps its current iterate.
const DERIVATIVE_EPSILON: f64 = 1e-10;

/// Dampening weight for an opponent's rating deviation.
fn g(deviation: f64) -> f64 {
    1.0 / (1.0 + 3.0 * Q * Q * deviation * deviation / (PI * PI)).sqrt()
}

/// Expected score against an opponent, weighted by the opponent's deviation.
pub fn expected_score(rating: f64, opponent_rating: f64, opponent_deviation: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-g(opponent_deviation) * (rating - opponent_rating) / 400.0))
}

/// Estimated variance of the rating from the period's games (d^2).
fn estimated_variance(rating: f64, results: &[MatchResult]) -> f64 {
    let mut sum = 0.0;
    for result in results {
        let weight = g(result.opponent_deviation);
        let expected = expected_score(rating, result.opponent_rating, result.opponent_deviation);
        sum += weight * weight * expected * (1.0 - expected);
    }

    1.0 / (Q * Q * sum)
}

fn preliminary_rating(current: &PlayerRating, results: &[MatchResult], d_squared: f64) -> f64 {
    let mut sum = 0.0;
    for result in results {
        let expected =
            expected_score(current.rating, result.opponent_rating, result.opponent_deviation);
        sum += g(result.opponent_deviation) * (result.outcome.score() - expected);
    }

    let deviation_squared = current.deviation * current.deviation;
    current.rating + (Q / (1.0 / d_squared + 1.0 / deviation_squared)) * sum
}

/// Newton-Raphson solve for the new volatility. Non-convergence within the
/// iteration cap is not an error: the current iterate is returned.
fn solve_volatility(
    current: &PlayerRating,
    results: &[MatchResult],
    d_squared: f64,
    settings: &GlickoSettings,
) -> f64 {
    let a = (current.volatility * current.volatility).ln();
    let tau_squared = settings.tau * settings.tau;

    // Sum of g^2 * (score - E)^2 over the period; constant across iterations.
    let mut improvement = 0.0;
    for result in results {
        let weight = g(result.opponent_deviation);
        let expected =
            expected_score(current.rating, result.opponent_rating, result.opponent_deviation);
        let residual = result.outcome.score() - expected;
        improvement += weight * weight * residual * residual;
    }

    let f = |x: f64| {
        x.exp() * (improvement - d_squared) / (2.0 * d_squared * d_squared) - (x - a) / tau_squared
    };
    let f_prime =
        |x: f64| x.exp() * (improvement - d_squared) / (d_squared * d_squared) - 1.0 / tau_squared;

    let mut x = a;
    let mut prev_x = a;
    for iteration in 0..settings.max_iterations {
        let derivative = f_prime(x);
        if derivative.abs() < DERIVATIVE_EPSILON {
            debug!(
                "volatility solve stopped on a flat derivative after {} iterations",
                iteration
            );
            break;
        }

        x -= f(x) / derivative;

        if (x - prev_x).abs() < settings.convergence_tolerance {
            debug!("volatility solve converged in {} iterations", iteration + 1);
            break;
        }
        prev_x = x;
    }

    (x / 2.0).exp()
}

/// Apply one rating period's results to a player's rating.
///
/// An empty period returns the input unchanged; a player who did not compete
/// keeps rating and volatility, and RD only grows through
/// [`apply_inactivity_decay`].
pub fn update_rating(
    current: &PlayerRating,
    results: &[MatchResult],
    settings: &GlickoSettings,
) -> PlayerRating {
    if results.is_empty() {
        return *current;
    }

    let d_squared = estimated_variance(current.rating, results);
    let new_rating = preliminary_rating(current, results, d_squared);
    let new_volatility = solve_volatility(current, results, d_squared, settings);

    let deviation_squared = current.deviation * current.deviation;
    let new_deviation = (1.0 / (1.0 / deviation_squared + 1.0 / d_squared)).sqrt();

    PlayerRating {
        rating: new_rating,
        deviation: new_deviation,
        volatility: new_volatility,
    }
}

/// Rating for a player with no history.
pub fn default_rating(settings: &GlickoSettings) -> PlayerRating {
    PlayerRating {
        rating: settings.default_rating,
        deviation: settings.default_deviation,
        volatility: settings.default_volatility,
    }
}

/// Rating delta a single result would produce. Convenience wrapper around
/// [`update_rating`] with a one-game period.
pub fn rating_change(
    current: &PlayerRating,
    opponent_rating: f64,
    opponent_deviation: f64,
    outcome: MatchOutcome,
    settings: &GlickoSettings,
) -> f64 {
    let result = MatchResult {
        opponent_rating,
        opponent_deviation,
        outcome,
    };

    let updated = update_rating(current, &[result], settings);
    updated.rating - current.rating
}

/// Inflate RD for rating periods spent inactive, up to the deviation ceiling.
/// Separate from the match path; never invoked by [`update_rating`].
pub fn apply_inactivity_decay(
    current: &PlayerRating,
    periods: u32,
    settings: &GlickoSettings,
) -> PlayerRating {
    let variance = current.deviation * current.deviation
        + current.volatility * current.volatility * periods as f64;

    PlayerRating {
        rating: current.rating,
        deviation: variance.sqrt().min(settings.max_deviation),
        volatility: current.volatility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GlickoSettings {
        GlickoSettings::default()
    }

    fn default() -> PlayerRating {
        default_rating(&settings())
    }

    fn win_against(opponent: &PlayerRating) -> MatchResult {
        MatchResult {
            opponent_rating: opponent.rating,
            opponent_deviation: opponent.deviation,
            outcome: MatchOutcome::Win,
        }
    }

    fn loss_against(opponent: &PlayerRating) -> MatchResult {
        MatchResult {
            opponent_rating: opponent.rating,
            opponent_deviation: opponent.deviation,
            outcome: MatchOutcome::Loss,
        }
    }

    #[test]
    fn test_empty_period_returns_input_unchanged() {
        let current = PlayerRating {
            rating: 1712.3,
            deviation: 81.5,
            volatility: 0.059,
        };

        let updated = update_rating(&current, &[], &settings());

        assert_eq!(updated, current);
    }

    #[test]
    fn test_winner_gains_and_loser_drops_from_equal_start() {
        let winner = update_rating(&default(), &[win_against(&default())], &settings());
        let loser = update_rating(&default(), &[loss_against(&default())], &settings());

        assert!(winner.rating > 1500.0);
        assert!(loser.rating < 1500.0);
        // Equal ratings and deviations make the exchange symmetric.
        assert!((winner.rating - 1500.0 + (loser.rating - 1500.0)).abs() < 1e-9);
    }

    #[test]
    fn test_deviation_shrinks_with_evidence() {
        let fixtures = [
            default(),
            PlayerRating {
                rating: 1500.0,
                deviation: 200.0,
                volatility: 0.06,
            },
            PlayerRating {
                rating: 1850.0,
                deviation: 50.0,
                volatility: 0.06,
            },
        ];

        for current in fixtures {
            let updated = update_rating(&current, &[win_against(&default())], &settings());
            assert!(
                updated.deviation <= current.deviation,
                "RD grew from {} to {}",
                current.deviation,
                updated.deviation
            );
        }
    }

    #[test]
    fn test_draw_between_equals_leaves_rating_unchanged() {
        let result = MatchResult {
            opponent_rating: 1500.0,
            opponent_deviation: 350.0,
            outcome: MatchOutcome::Draw,
        };

        let updated = update_rating(&default(), &[result], &settings());

        assert_eq!(updated.rating, 1500.0);
        assert!(updated.deviation < 350.0);
    }

    #[test]
    fn test_expected_score_is_half_for_equal_ratings() {
        let expected = expected_score(1500.0, 1500.0, 350.0);
        assert!((expected - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_score_favors_higher_rating() {
        let strong = expected_score(1700.0, 1500.0, 100.0);
        let weak = expected_score(1500.0, 1700.0, 100.0);

        assert!(strong > 0.5);
        assert!(weak < 0.5);
        assert!((strong + weak - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rating_change_sign_follows_outcome() {
        let gain = rating_change(&default(), 1500.0, 350.0, MatchOutcome::Win, &settings());
        let drop = rating_change(&default(), 1500.0, 350.0, MatchOutcome::Loss, &settings());

        assert!(gain > 0.0);
        assert!(drop < 0.0);
    }

    #[test]
    fn test_single_match_is_well_defined() {
        let updated = update_rating(&default(), &[win_against(&default())], &settings());

        assert!(updated.rating.is_finite());
        assert!(updated.deviation.is_finite());
        assert!(updated.volatility.is_finite());
        assert!(updated.deviation > 0.0);
        assert!(updated.volatility > 0.0);
    }

    #[test]
    fn test_zero_iterations_keeps_seed_volatility() {
        let constrained = GlickoSettings {
            max_iterations: 0,
            ..GlickoSettings::default()
        };

        let updated = update_rating(&default(), &[win_against(&default())], &constrained);

        // The solver returns its seed, exp(ln(volatility^2) / 2).
        assert!((updated.volatility - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_inactivity_decay_grows_deviation_up_to_cap() {
        let active = PlayerRating {
            rating: 1600.0,
            deviation: 80.0,
            volatility: 0.06,
        };

        let one = apply_inactivity_decay(&active, 1, &settings());
        assert!(one.deviation > active.deviation);
        assert_eq!(one.rating, active.rating);
        assert_eq!(one.volatility, active.volatility);

        let long_gone = apply_inactivity_decay(&active, 200_000_000, &settings());
        assert_eq!(long_gone.deviation, 350.0);
    }

    #[test]
    fn test_stronger_opponent_yields_bigger_upset_gain() {
        let favorite = PlayerRating {
            rating: 1800.0,
            deviation: 100.0,
            volatility: 0.06,
        };
        let underdog_result = update_rating(&default(), &[win_against(&favorite)], &settings());
        let even_result = update_rating(&default(), &[win_against(&default())], &settings());

        assert!(underdog_result.rating > even_result.rating);
    }
}
