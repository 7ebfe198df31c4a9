use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::error::{AuraError, Result};

/// Kind of interaction recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryType {
    /// A spoken describe query.
    Voice,
    /// A logged position fix.
    Location,
}

impl std::fmt::Display for HistoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Voice => write!(f, "VOICE"),
            Self::Location => write!(f, "LOCATION"),
        }
    }
}

impl std::str::FromStr for HistoryType {
    type Err = AuraError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "VOICE" => Ok(Self::Voice),
            "LOCATION" => Ok(Self::Location),
            other => Err(AuraError::Internal(format!(
                "Unknown history type '{other}' in store"
            ))),
        }
    }
}

/// Append-only record of a user interaction. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub id: String,
    pub user_id: String,
    pub record_type: HistoryType,
    pub content: String,
    pub location: Option<Coordinates>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    /// A new voice-query record stamped with the current time.
    pub fn voice(user_id: impl Into<String>, content: impl Into<String>, location: Option<Coordinates>) -> Self {
        Self {
            id: nanoid::nanoid!(),
            user_id: user_id.into(),
            record_type: HistoryType::Voice,
            content: content.into(),
            location,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_type_round_trips_through_store_format() {
        assert_eq!(HistoryType::Voice.to_string(), "VOICE");
        assert_eq!("VOICE".parse::<HistoryType>().unwrap(), HistoryType::Voice);
        assert_eq!(
            "LOCATION".parse::<HistoryType>().unwrap(),
            HistoryType::Location
        );
        assert!("VIDEO".parse::<HistoryType>().is_err());
    }

    #[test]
    fn voice_record_gets_id_and_timestamp() {
        let before = Utc::now();
        let record = HistoryRecord::voice("user-1", "what's ahead", None);
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.record_type, HistoryType::Voice);
        assert_eq!(record.content, "what's ahead");
        assert!(!record.id.is_empty());
        assert!(record.timestamp >= before);
    }
}
