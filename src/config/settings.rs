/// Parameters of the Glicko-2 update and its volatility solver.
pub struct GlickoSettings {
    pub default_rating: f64,
    pub default_deviation: f64,
    pub default_volatility: f64,
    /// Ceiling for the rating deviation; inactivity decay never pushes past it.
    pub max_deviation: f64,
    /// Volatility dampening factor (tau).
    pub tau: f64,
    pub convergence_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for GlickoSettings {
    fn default() -> Self {
        Self {
            default_rating: 1500.0,
            default_deviation: 350.0,
            default_volatility: 0.06,
            max_deviation: 350.0,
            tau: 0.5,
            convergence_tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// How tournament placements translate into virtual matches.
pub struct PlacementSettings {
    /// Placements beyond this rank carry no rating weight.
    pub max_scored_placement: i32,
    /// Rating margin above the field average for a 1st place virtual opponent.
    pub first_place_margin: f64,
    /// Rating margin above the field average for a 2nd place virtual opponent.
    pub second_place_margin: f64,
    /// Deviation assumed for the synthetic field-average opponent.
    pub virtual_opponent_deviation: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            max_scored_placement: 3,
            first_place_margin: 150.0,
            second_place_margin: 50.0,
            virtual_opponent_deviation: 30.0,
        }
    }
}

/// Parameters of the composite leaderboard score.
pub struct RankingSettings {
    /// Bayesian prior expressed in phantom games, half of them wins.
    pub min_games_for_ranking: i32,
    pub self_weight: f64,
    pub opponent_weight: f64,
    /// Synthetic win credit for a 1st place finish.
    pub first_place_bonus_wins: i32,
    /// Synthetic win credit for a 2nd place finish.
    pub second_place_bonus_wins: i32,
    /// Win-equivalents a tournament victory is worth in the monthly score.
    pub monthly_tournament_bonus: i32,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            min_games_for_ranking: 10,
            self_weight: 0.7,
            opponent_weight: 0.3,
            first_place_bonus_wins: 5,
            second_place_bonus_wins: 2,
            monthly_tournament_bonus: 5,
        }
    }
}

pub struct AppConfig {
    pub glicko: GlickoSettings,
    pub placement: PlacementSettings,
    pub ranking: RankingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            glicko: GlickoSettings::default(),
            placement: PlacementSettings::default(),
            ranking: RankingSettings::default(),
        }
    }
}

// Prefer passing these explicitly (dependency injection) rather than globals.
