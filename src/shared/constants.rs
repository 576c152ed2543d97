/// Default number of rows returned by admin list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum rows returned by the analytics listing
pub const MAX_ANALYTICS_ROWS: i64 = 10_000;

/// Number of links in the "top links" block of the stats summary
pub const TOP_LINKS_LIMIT: i64 = 10;

/// Maximum tags returned alongside a home page search
pub const MATCHING_TAGS_LIMIT: usize = 5;

/// Links created within this many days show up under "new this week"
pub const NEW_LINK_WINDOW_DAYS: i64 = 7;

/// Maximum links in the "new this week" section
pub const NEW_LINKS_LIMIT: usize = 8;

/// Concurrent requests when checking every active link
pub const HEALTH_CHECK_CONCURRENCY: usize = 8;

/// Default color for newly created tags
pub const DEFAULT_TAG_COLOR: &str = "#3b82f6";

/// Category slugs backed by time buckets; their slug is fixed
pub const TIME_BASED_CATEGORY_SLUGS: [&str; 2] = ["this-week", "this-month"];

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full access to the management API
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// COOKIES
// =============================================================================

/// Browser-level id used to deduplicate votes
pub const VOTE_SESSION_COOKIE: &str = "vote_session_id";

/// Lifetime of vote cookies
pub const VOTE_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Session-lifetime cookie grouping clicks into analytics sessions
pub const ANALYTICS_SESSION_COOKIE: &str = "analytics_session_id";
