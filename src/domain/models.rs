use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PlayerId = i64;

/// Registered player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recorded 1v1 match result. Append-only; never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub winner_id: PlayerId,
    pub played_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl MatchRecord {
    /// Caller contract: two distinct participants, winner is one of them.
    pub fn validate(&self) -> Result<()> {
        if self.player1_id == self.player2_id {
            bail!(
                "match {} has identical participants ({})",
                self.id,
                self.player1_id
            );
        }
        if self.winner_id != self.player1_id && self.winner_id != self.player2_id {
            bail!(
                "match {} winner {} is not one of the participants",
                self.id,
                self.winner_id
            );
        }
        Ok(())
    }

    pub fn loser_id(&self) -> PlayerId {
        if self.winner_id == self.player1_id {
            self.player2_id
        } else {
            self.player1_id
        }
    }
}

/// Tournament metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub tournament_date: DateTime<Utc>,
}

/// Final standing of one player in one tournament (1 = first place).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentPlacement {
    pub id: i64,
    pub player_id: PlayerId,
    pub tournament_id: i64,
    pub placement: i32,
    pub created_at: DateTime<Utc>,
}

/// Outcome tag recorded alongside every rating change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeTag {
    Win,
    Loss,
    TournamentFirst,
    TournamentSecond,
    TournamentThird,
}

impl OutcomeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeTag::Win => "win",
            OutcomeTag::Loss => "loss",
            OutcomeTag::TournamentFirst => "tournament_1st",
            OutcomeTag::TournamentSecond => "tournament_2nd",
            OutcomeTag::TournamentThird => "tournament_3rd",
        }
    }
}

/// What triggered a rating change, for the audit trail.
#[derive(Debug, Clone)]
pub struct RatingUpdateContext {
    pub match_id: Option<i64>,
    pub tournament_id: Option<i64>,
    pub opponent_id: Option<PlayerId>,
    pub outcome: OutcomeTag,
}

impl RatingUpdateContext {
    pub fn for_match(match_id: i64, opponent_id: PlayerId, outcome: OutcomeTag) -> Self {
        Self {
            match_id: Some(match_id),
            tournament_id: None,
            opponent_id: Some(opponent_id),
            outcome,
        }
    }

    pub fn for_tournament(tournament_id: i64, outcome: OutcomeTag) -> Self {
        Self {
            match_id: None,
            tournament_id: Some(tournament_id),
            opponent_id: None,
            outcome,
        }
    }
}

/// Before/after view of a single rating update, returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingUpdateResult {
    pub player_id: PlayerId,
    pub rating_before: f64,
    pub rating_after: f64,
    pub rating_change: f64,
    pub rd_before: f64,
    pub rd_after: f64,
    pub volatility_before: f64,
    pub volatility_after: f64,
}

/// One append-only audit row per rating change. Written by the orchestrator,
/// never read back by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingHistoryEntry {
    pub player_id: PlayerId,
    pub match_id: Option<i64>,
    pub tournament_id: Option<i64>,
    pub opponent_id: Option<PlayerId>,
    pub rating_before: f64,
    pub rating_after: f64,
    pub rating_change: f64,
    pub rd_before: f64,
    pub rd_after: f64,
    pub volatility_before: f64,
    pub volatility_after: f64,
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn match_record(p1: PlayerId, p2: PlayerId, winner: PlayerId) -> MatchRecord {
        MatchRecord {
            id: 1,
            player1_id: p1,
            player2_id: p2,
            winner_id: winner,
            played_at: Utc::now(),
            note: None,
        }
    }

    #[test]
    fn test_validate_accepts_winner_from_pair() {
        assert!(match_record(1, 2, 1).validate().is_ok());
        assert!(match_record(1, 2, 2).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_foreign_winner() {
        assert!(match_record(1, 2, 3).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_self_play() {
        assert!(match_record(1, 1, 1).validate().is_err());
    }

    #[test]
    fn test_loser_id() {
        assert_eq!(match_record(1, 2, 1).loser_id(), 2);
        assert_eq!(match_record(1, 2, 2).loser_id(), 1);
    }
}
