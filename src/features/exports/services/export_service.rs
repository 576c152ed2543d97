use std::sync::Arc;

use crate::core::error::Result;
use crate::features::analytics::dtos::AnalyticsQueryParams;
use crate::features::analytics::services::AnalyticsService;
use crate::features::exports::models::{
    write_csv, AnalyticsCsvRow, LinkCsvRow, ANALYTICS_CSV_HEADERS, LINK_CSV_HEADERS,
};
use crate::features::links::services::LinkService;

/// CSV downloads for the admin panel
pub struct ExportService {
    links: Arc<LinkService>,
    analytics: Arc<AnalyticsService>,
}

impl ExportService {
    pub fn new(links: Arc<LinkService>, analytics: Arc<AnalyticsService>) -> Self {
        Self { links, analytics }
    }

    /// Every link, in admin list order
    pub async fn links_csv(&self) -> Result<String> {
        let links = self.links.list_all().await?;
        let count = links.len();
        let csv = write_csv(&LINK_CSV_HEADERS, links.into_iter().map(LinkCsvRow::from))?;
        tracing::info!("Exported {} links", count);
        Ok(csv)
    }

    pub async fn analytics_csv(&self, params: &AnalyticsQueryParams) -> Result<String> {
        let rows = self.analytics.list(params).await?;
        let count = rows.len();
        let csv = write_csv(
            &ANALYTICS_CSV_HEADERS,
            rows.into_iter().map(AnalyticsCsvRow::from),
        )?;
        tracing::info!("Exported {} click records", count);
        Ok(csv)
    }
}
