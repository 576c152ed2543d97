use woothee::parser::Parser;

const UNKNOWN: &str = "UNKNOWN";

/// Device details derived from a `User-Agent` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_type: String,
    pub browser: Option<String>,
    pub os: Option<String>,
}

fn known(value: &str) -> Option<String> {
    (!value.is_empty() && value != UNKNOWN).then(|| value.to_string())
}

fn device_type(category: &str) -> &'static str {
    match category {
        "smartphone" | "mobilephone" => "mobile",
        "crawler" => "bot",
        _ => "desktop",
    }
}

pub fn parse_user_agent(user_agent: Option<&str>) -> DeviceInfo {
    let ua = user_agent.map(str::trim).unwrap_or_default();
    if ua.is_empty() {
        return DeviceInfo {
            device_type: "unknown".to_string(),
            browser: None,
            os: None,
        };
    }

    match Parser::new().parse(ua) {
        Some(result) => DeviceInfo {
            device_type: device_type(result.category).to_string(),
            browser: known(result.name),
            os: known(result.os),
        },
        None => DeviceInfo {
            device_type: "desktop".to_string(),
            browser: None,
            os: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iphone_is_mobile() {
        let info = parse_user_agent(Some(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 \
             (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1",
        ));
        assert_eq!(info.device_type, "mobile");
        assert_eq!(info.browser.as_deref(), Some("Safari"));
        assert_eq!(info.os.as_deref(), Some("iPhone"));
    }

    #[test]
    fn test_desktop_chrome() {
        let info = parse_user_agent(Some(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ));
        assert_eq!(info.device_type, "desktop");
        assert_eq!(info.browser.as_deref(), Some("Chrome"));
    }

    #[test]
    fn test_crawler_is_bot() {
        let info = parse_user_agent(Some(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
        ));
        assert_eq!(info.device_type, "bot");
    }

    #[test]
    fn test_missing_user_agent_is_unknown() {
        assert_eq!(parse_user_agent(None).device_type, "unknown");
        assert_eq!(parse_user_agent(Some("  ")).device_type, "unknown");
    }

    #[test]
    fn test_unrecognised_agent_defaults_to_desktop() {
        let info = parse_user_agent(Some("my-script/0.1"));
        assert_eq!(info.device_type, "desktop");
        assert!(info.browser.is_none());
    }
}
