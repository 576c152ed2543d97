use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::votes::models::{VoteCounts, VoteType};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CastVoteDto {
    pub vote_type: VoteType,
}

/// Vote totals for a link plus the caller's own vote, if any
#[derive(Debug, Serialize, ToSchema)]
pub struct VoteStatusDto {
    pub link_id: Uuid,
    pub upvote_count: i32,
    pub downvote_count: i32,
    pub user_vote: Option<VoteType>,
}

impl VoteStatusDto {
    pub fn new(link_id: Uuid, counts: VoteCounts, user_vote: Option<VoteType>) -> Self {
        Self {
            link_id,
            upvote_count: counts.upvote_count,
            downvote_count: counts.downvote_count,
            user_vote,
        }
    }
}
