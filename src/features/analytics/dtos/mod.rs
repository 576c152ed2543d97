pub mod analytics_dto;
pub mod stats_dto;

pub use analytics_dto::{
    AnalyticsQueryParams, AnalyticsSessionResponseDto, ClickResponseDto,
    LinkAnalyticsResponseDto, SessionQueryParams,
};
pub use stats_dto::{CategoryStatsDto, StatsSummaryDto, StatsTotalsDto, TopLinkDto};
