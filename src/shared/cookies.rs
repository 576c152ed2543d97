use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use uuid::Uuid;

/// Visitor id of the form `{prefix}_{unix_millis}_{9 random alphanumerics}`
pub fn generate_session_id(prefix: &str) -> String {
    let random: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), random)
}

/// Site-wide visitor cookie. `max_age_days = None` makes it a session cookie.
pub fn visitor_cookie(
    name: impl Into<String>,
    value: impl Into<String>,
    max_age_days: Option<i64>,
    secure: bool,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name.into(), value.into()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);

    if let Some(days) = max_age_days {
        builder = builder.max_age(time::Duration::days(days));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let id = generate_session_id("vote");
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "vote");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_visitor_cookie_attributes() {
        let cookie = visitor_cookie("vote_session_id", "abc", Some(365), true);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(365)));

        let session = visitor_cookie("analytics_session_id", "xyz", None, false);
        assert!(session.max_age().is_none());
    }
}
