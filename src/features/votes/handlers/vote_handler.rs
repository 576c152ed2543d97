use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, ClientContext};
use crate::features::votes::dtos::{CastVoteDto, VoteStatusDto};
use crate::features::votes::models::VoteType;
use crate::features::votes::services::VoteService;
use crate::shared::constants::{VOTE_COOKIE_MAX_AGE_DAYS, VOTE_SESSION_COOKIE};
use crate::shared::cookies::{generate_session_id, visitor_cookie};
use crate::shared::types::ApiResponse;

/// Name of the cookie remembering a visitor's vote on one link
pub fn vote_cookie_name(session_id: &str, link_id: Uuid) -> String {
    format!("vote_{}_{}", session_id, link_id)
}

fn remembered_vote(jar: &CookieJar, link_id: Uuid) -> Option<VoteType> {
    let session_id = jar.get(VOTE_SESSION_COOKIE)?.value().to_string();
    jar.get(&vote_cookie_name(&session_id, link_id))
        .and_then(|c| c.value().parse().ok())
}

/// Vote totals and the caller's own vote
#[utoipa::path(
    get,
    path = "/api/links/{id}/vote",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Vote status", body = ApiResponse<VoteStatusDto>),
        (status = 404, description = "Link not found")
    ),
    tag = "votes"
)]
pub async fn get_vote(
    State(service): State<Arc<VoteService>>,
    Path(link_id): Path<Uuid>,
    jar: CookieJar,
) -> Result<Json<ApiResponse<VoteStatusDto>>> {
    let counts = service.counts(link_id).await?;
    let status = VoteStatusDto::new(link_id, counts, remembered_vote(&jar, link_id));
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}

/// Upvote or downvote a link.
///
/// Voting the same way twice is rejected; switching replaces the earlier vote.
#[utoipa::path(
    post,
    path = "/api/links/{id}/vote",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    request_body = CastVoteDto,
    responses(
        (status = 200, description = "Vote recorded", body = ApiResponse<VoteStatusDto>),
        (status = 404, description = "Link not found"),
        (status = 409, description = "Already voted this way")
    ),
    tag = "votes"
)]
pub async fn cast_vote(
    State(service): State<Arc<VoteService>>,
    Path(link_id): Path<Uuid>,
    client: ClientContext,
    jar: CookieJar,
    AppJson(dto): AppJson<CastVoteDto>,
) -> Result<(CookieJar, Json<ApiResponse<VoteStatusDto>>)> {
    let session_id = jar
        .get(VOTE_SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_else(|| generate_session_id("vote"));
    let previous = remembered_vote(&jar, link_id);

    let counts = service
        .cast(link_id, &session_id, previous, dto.vote_type, &client)
        .await?;

    let secure = service.cookie_secure();
    let jar = jar
        .add(visitor_cookie(
            VOTE_SESSION_COOKIE,
            session_id.clone(),
            Some(VOTE_COOKIE_MAX_AGE_DAYS),
            secure,
        ))
        .add(visitor_cookie(
            vote_cookie_name(&session_id, link_id),
            dto.vote_type.as_str(),
            Some(VOTE_COOKIE_MAX_AGE_DAYS),
            secure,
        ));

    let status = VoteStatusDto::new(link_id, counts, Some(dto.vote_type));
    Ok((
        jar,
        Json(ApiResponse::success(
            Some(status),
            Some(format!("Your {} has been recorded", dto.vote_type)),
            None,
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remembered_vote_reads_per_link_cookie() {
        let link_id = Uuid::new_v4();
        let jar = CookieJar::new()
            .add(visitor_cookie(VOTE_SESSION_COOKIE, "vote_1_abc", None, false))
            .add(visitor_cookie(
                vote_cookie_name("vote_1_abc", link_id),
                "downvote",
                None,
                false,
            ));

        assert_eq!(remembered_vote(&jar, link_id), Some(VoteType::Downvote));
        assert_eq!(remembered_vote(&jar, Uuid::new_v4()), None);
    }

    #[test]
    fn test_no_session_means_no_vote() {
        let link_id = Uuid::new_v4();
        let jar = CookieJar::new().add(visitor_cookie(
            vote_cookie_name("vote_1_abc", link_id),
            "upvote",
            None,
            false,
        ));
        assert_eq!(remembered_vote(&jar, link_id), None);
    }
}
