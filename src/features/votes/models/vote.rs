use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Vote type (matches PostgreSQL enum `vote_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "vote_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            other => Err(format!("Unknown vote type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct VoteCounts {
    pub upvote_count: i32,
    pub downvote_count: i32,
}

/// What to do with a vote given the one already recorded in the visitor's cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDecision {
    Insert,
    Replace { previous: VoteType },
}

impl VoteDecision {
    /// Same vote twice is rejected; a different vote replaces the previous one
    pub fn evaluate(
        previous: Option<VoteType>,
        requested: VoteType,
    ) -> Result<VoteDecision, AppError> {
        match previous {
            None => Ok(VoteDecision::Insert),
            Some(previous) if previous == requested => Err(AppError::Conflict(
                "You have already voted on this link".to_string(),
            )),
            Some(previous) => Ok(VoteDecision::Replace { previous }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_vote_is_inserted() {
        assert_eq!(
            VoteDecision::evaluate(None, VoteType::Upvote).unwrap(),
            VoteDecision::Insert
        );
    }

    #[test]
    fn test_repeated_vote_is_rejected() {
        let result = VoteDecision::evaluate(Some(VoteType::Upvote), VoteType::Upvote);
        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "You have already voted on this link"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_changed_vote_replaces() {
        assert_eq!(
            VoteDecision::evaluate(Some(VoteType::Upvote), VoteType::Downvote).unwrap(),
            VoteDecision::Replace {
                previous: VoteType::Upvote
            }
        );
    }

    #[test]
    fn test_vote_type_parsing() {
        assert_eq!("downvote".parse::<VoteType>(), Ok(VoteType::Downvote));
        assert!("Upvote".parse::<VoteType>().is_err());
        assert_eq!(VoteType::Upvote.to_string(), "upvote");
    }
}
