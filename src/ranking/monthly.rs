use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::settings::RankingSettings;
use crate::domain::models::{MatchRecord, Player, PlayerId, Tournament, TournamentPlacement};

/// Player-of-the-month pick with the counters behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyHighlight {
    pub player_id: PlayerId,
    pub name: String,
    pub total_wins: i32,
    pub total_matches: i32,
    pub win_percentage: f64,
    pub tournament_wins: i32,
    pub monthly_score: i32,
}

/// Pick the standout player for the window `[month_start, month_end)`.
///
/// Score is wins in the window plus a fixed credit per tournament victory
/// whose tournament date falls inside it. Players with no activity in the
/// window are excluded; `None` when nobody qualifies. The caller supplies
/// the window, so results are reproducible for any past month.
pub fn player_of_month(
    players: &[Player],
    matches: &[MatchRecord],
    placements: &[TournamentPlacement],
    tournaments: &[Tournament],
    month_start: DateTime<Utc>,
    month_end: DateTime<Utc>,
    settings: &RankingSettings,
) -> Option<MonthlyHighlight> {
    let in_window = |at: DateTime<Utc>| at >= month_start && at < month_end;

    let mut wins_by_player: HashMap<PlayerId, i32> = HashMap::new();
    let mut matches_by_player: HashMap<PlayerId, i32> = HashMap::new();
    let mut tournament_wins_by_player: HashMap<PlayerId, i32> = HashMap::new();

    for record in matches.iter().filter(|m| in_window(m.played_at)) {
        *matches_by_player.entry(record.player1_id).or_insert(0) += 1;
        *matches_by_player.entry(record.player2_id).or_insert(0) += 1;
        *wins_by_player.entry(record.winner_id).or_insert(0) += 1;
    }

    let tournament_dates: HashMap<i64, DateTime<Utc>> = tournaments
        .iter()
        .map(|t| (t.id, t.tournament_date))
        .collect();

    for placement in placements {
        if placement.placement != 1 {
            continue;
        }
        let Some(&date) = tournament_dates.get(&placement.tournament_id) else {
            continue;
        };
        if in_window(date) {
            *tournament_wins_by_player
                .entry(placement.player_id)
                .or_insert(0) += 1;
        }
    }

    let mut candidates: Vec<MonthlyHighlight> = Vec::new();
    for player in players {
        let total_wins = *wins_by_player.get(&player.id).unwrap_or(&0);
        let total_matches = *matches_by_player.get(&player.id).unwrap_or(&0);
        let tournament_wins = *tournament_wins_by_player.get(&player.id).unwrap_or(&0);

        if total_matches == 0 && tournament_wins == 0 {
            continue;
        }

        candidates.push(MonthlyHighlight {
            player_id: player.id,
            name: player.name.clone(),
            total_wins,
            total_matches,
            win_percentage: if total_matches > 0 {
                total_wins as f64 / total_matches as f64 * 100.0
            } else {
                0.0
            },
            tournament_wins,
            monthly_score: total_wins + tournament_wins * settings.monthly_tournament_bonus,
        });
    }

    candidates.sort_by(|a, b| {
        b.monthly_score
            .cmp(&a.monthly_score)
            .then_with(|| b.win_percentage.total_cmp(&a.win_percentage))
            .then_with(|| b.total_matches.cmp(&a.total_matches))
            .then_with(|| a.name.cmp(&b.name))
    });

    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings() -> RankingSettings {
        RankingSettings::default()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        )
    }

    fn player(id: PlayerId, name: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            avatar_url: None,
            created_at: at(1),
        }
    }

    fn match_on(day: u32, p1: PlayerId, p2: PlayerId, winner: PlayerId) -> MatchRecord {
        MatchRecord {
            id: day as i64,
            player1_id: p1,
            player2_id: p2,
            winner_id: winner,
            played_at: at(day),
            note: None,
        }
    }

    #[test]
    fn test_no_activity_yields_none() {
        let (start, end) = window();
        let players = vec![player(1, "Ada")];

        let pick = player_of_month(&players, &[], &[], &[], start, end, &settings());
        assert!(pick.is_none());
    }

    #[test]
    fn test_matches_outside_window_are_ignored() {
        let (start, end) = window();
        let players = vec![player(1, "Ada"), player(2, "Ben")];
        let stale = MatchRecord {
            id: 1,
            player1_id: 1,
            player2_id: 2,
            winner_id: 1,
            played_at: Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap(),
            note: None,
        };

        let pick = player_of_month(&players, &[stale], &[], &[], start, end, &settings());
        assert!(pick.is_none());
    }

    #[test]
    fn test_tournament_win_outscores_few_match_wins() {
        let (start, end) = window();
        let players = vec![player(1, "Ada"), player(2, "Ben"), player(3, "Eve")];
        // Ada: 3 match wins. Eve: one tournament victory worth 5.
        let matches = vec![
            match_on(2, 1, 2, 1),
            match_on(3, 1, 2, 1),
            match_on(4, 1, 2, 1),
        ];
        let tournaments = vec![Tournament {
            id: 10,
            name: "June Open".to_string(),
            tournament_date: at(15),
        }];
        let placements = vec![TournamentPlacement {
            id: 1,
            player_id: 3,
            tournament_id: 10,
            placement: 1,
            created_at: at(15),
        }];

        let pick = player_of_month(
            &players,
            &matches,
            &placements,
            &tournaments,
            start,
            end,
            &settings(),
        )
        .unwrap();

        assert_eq!(pick.player_id, 3);
        assert_eq!(pick.monthly_score, 5);
        assert_eq!(pick.total_matches, 0);
    }

    #[test]
    fn test_tie_breaks_on_win_percentage_then_name() {
        let (start, end) = window();
        let players = vec![player(1, "Zed"), player(2, "Ada"), player(3, "Mel")];
        // Zed 2/2, Mel 2/4: same score, Zed's percentage is higher.
        let matches = vec![
            match_on(2, 1, 3, 1),
            match_on(3, 1, 3, 1),
            match_on(4, 3, 2, 3),
            match_on(5, 3, 2, 3),
        ];

        let pick =
            player_of_month(&players, &matches, &[], &[], start, end, &settings()).unwrap();
        assert_eq!(pick.player_id, 1);
        assert_eq!(pick.total_wins, 2);
    }
}
