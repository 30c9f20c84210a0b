//! Result records for the match-history backend
//!
//! Uses postcard for compact binary storage and serde_json for HTTP bodies

use postcard::{from_bytes, to_allocvec};
use std::fmt;

// ============================================================================
// Records
// ============================================================================

/// A finished two-paddle match.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchRecord {
    pub player1: String,
    pub player2: String,
    pub player1_score: u32,
    pub player2_score: u32,
    pub winner: String,
}

/// A finished bracket or elimination round.
///
/// Field names follow the backend's tournament endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TournamentRecord {
    pub creator_name: String,
    pub winner_nickname: String,
    pub participants_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResultRecord {
    Match(MatchRecord),
    Tournament(TournamentRecord),
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum RecordError {
    Binary(postcard::Error),
    Json(serde_json::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Binary(e) => write!(f, "binary record error: {}", e),
            RecordError::Json(e) => write!(f, "json record error: {}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<postcard::Error> for RecordError {
    fn from(e: postcard::Error) -> Self {
        RecordError::Binary(e)
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(e: serde_json::Error) -> Self {
        RecordError::Json(e)
    }
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl ResultRecord {
    /// Backend path the record is POSTed to
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResultRecord::Match(_) => "/api/user/matches/",
            ResultRecord::Tournament(_) => "/api/user/tournaments/",
        }
    }

    /// Winner's display name
    pub fn winner(&self) -> &str {
        match self {
            ResultRecord::Match(m) => &m.winner,
            ResultRecord::Tournament(t) => &t.winner_nickname,
        }
    }

    /// Serialize record to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(to_allocvec(self)?)
    }

    /// Deserialize record from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(from_bytes(bytes)?)
    }

    /// JSON request body, without the enum wrapper
    pub fn to_json_body(&self) -> Result<String, RecordError> {
        let body = match self {
            ResultRecord::Match(m) => serde_json::to_string(m)?,
            ResultRecord::Tournament(t) => serde_json::to_string(t)?,
        };
        Ok(body)
    }
}

impl From<MatchRecord> for ResultRecord {
    fn from(record: MatchRecord) -> Self {
        ResultRecord::Match(record)
    }
}

impl From<TournamentRecord> for ResultRecord {
    fn from(record: TournamentRecord) -> Self {
        ResultRecord::Tournament(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket_record() -> TournamentRecord {
        TournamentRecord {
            creator_name: "host".to_string(),
            winner_nickname: "P3".to_string(),
            participants_names: (1..=8).map(|i| format!("P{}", i)).collect(),
        }
    }

    #[test]
    fn test_tournament_body_uses_backend_field_names() {
        let record = ResultRecord::from(bracket_record());
        let body = record.to_json_body().unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["creator_name"], "host");
        assert_eq!(value["winner_nickname"], "P3");
        assert_eq!(value["participants_names"].as_array().unwrap().len(), 8);
        assert_eq!(record.endpoint(), "/api/user/tournaments/");
    }

    #[test]
    fn test_match_record_survives_binary_storage() {
        let record = ResultRecord::Match(MatchRecord {
            player1: "alice".to_string(),
            player2: "AI".to_string(),
            player1_score: 4,
            player2_score: 2,
            winner: "alice".to_string(),
        });

        let bytes = record.to_bytes().unwrap();
        let decoded = ResultRecord::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.winner(), "alice");
    }

    #[test]
    fn test_truncated_bytes_are_rejected() {
        let bytes = ResultRecord::from(bracket_record()).to_bytes().unwrap();
        let err = ResultRecord::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, RecordError::Binary(_)));
        assert!(err.to_string().starts_with("binary record error"));
    }
}
