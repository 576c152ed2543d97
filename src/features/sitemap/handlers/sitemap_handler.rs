use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::core::error::Result;
use crate::features::sitemap::services::SitemapService;

/// XML sitemap of the public pages
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses(
        (status = 200, description = "Sitemap", content_type = "application/xml", body = String)
    ),
    tag = "sitemap"
)]
pub async fn get_sitemap(State(service): State<Arc<SitemapService>>) -> Result<impl IntoResponse> {
    let xml = service.render().await?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}
