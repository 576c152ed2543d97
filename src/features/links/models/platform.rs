use reqwest::Url;

/// Social network recognised from a link's host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialPlatform {
    pub name: &'static str,
    pub icon: &'static str,
}

const PLATFORMS: [(&str, SocialPlatform); 18] = [
    ("instagram", SocialPlatform { name: "Instagram", icon: "📷" }),
    ("twitter", SocialPlatform { name: "Twitter", icon: "🐦" }),
    ("x", SocialPlatform { name: "X", icon: "𝕏" }),
    ("youtube", SocialPlatform { name: "YouTube", icon: "📺" }),
    ("linkedin", SocialPlatform { name: "LinkedIn", icon: "💼" }),
    ("facebook", SocialPlatform { name: "Facebook", icon: "👥" }),
    ("github", SocialPlatform { name: "GitHub", icon: "💻" }),
    ("discord", SocialPlatform { name: "Discord", icon: "💬" }),
    ("tiktok", SocialPlatform { name: "TikTok", icon: "🎵" }),
    ("pinterest", SocialPlatform { name: "Pinterest", icon: "📌" }),
    ("reddit", SocialPlatform { name: "Reddit", icon: "🤖" }),
    ("telegram", SocialPlatform { name: "Telegram", icon: "✈️" }),
    ("whatsapp", SocialPlatform { name: "WhatsApp", icon: "💚" }),
    ("snapchat", SocialPlatform { name: "Snapchat", icon: "👻" }),
    ("spotify", SocialPlatform { name: "Spotify", icon: "🎵" }),
    ("medium", SocialPlatform { name: "Medium", icon: "📝" }),
    ("dribbble", SocialPlatform { name: "Dribbble", icon: "🎨" }),
    ("behance", SocialPlatform { name: "Behance", icon: "🎨" }),
];

/// Short-link hosts mapped to their platform key
const ALIASES: [(&str, &str); 6] = [
    ("youtu.be", "youtube"),
    ("t.me", "telegram"),
    ("telegram.org", "telegram"),
    ("wa.me", "whatsapp"),
    ("discord.gg", "discord"),
    ("redd.it", "reddit"),
];

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Detect the platform from the URL host.
///
/// A host matches `<key>.com` or any subdomain of it, so `example.com` is not X.
pub fn detect_platform(url: &str) -> Option<SocialPlatform> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    let key = ALIASES
        .iter()
        .find(|(alias, _)| host_matches(&host, alias))
        .map(|(_, key)| *key);

    PLATFORMS
        .iter()
        .find(|(k, _)| match key {
            Some(alias_key) => *k == alias_key,
            None => host_matches(&host, &format!("{}.com", k)),
        })
        .map(|(_, platform)| *platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_common_hosts() {
        assert_eq!(
            detect_platform("https://www.instagram.com/someone").map(|p| p.name),
            Some("Instagram")
        );
        assert_eq!(
            detect_platform("https://x.com/someone").map(|p| p.name),
            Some("X")
        );
        assert_eq!(
            detect_platform("https://m.youtube.com/watch?v=1").map(|p| p.name),
            Some("YouTube")
        );
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            detect_platform("https://youtu.be/abc").map(|p| p.name),
            Some("YouTube")
        );
        assert_eq!(
            detect_platform("https://t.me/channel").map(|p| p.name),
            Some("Telegram")
        );
        assert_eq!(
            detect_platform("https://wa.me/15551234").map(|p| p.name),
            Some("WhatsApp")
        );
    }

    #[test]
    fn test_no_false_positive_on_suffix() {
        assert_eq!(detect_platform("https://example.com/x"), None);
        assert_eq!(detect_platform("https://notgithub.com"), None);
        assert_eq!(detect_platform("https://mediumrare.dev"), None);
        assert_eq!(detect_platform("not a url"), None);
    }

    #[test]
    fn test_non_com_platform_hosts() {
        assert_eq!(
            detect_platform("https://discord.gg/invite").map(|p| p.name),
            Some("Discord")
        );
        assert_eq!(
            detect_platform("https://telegram.org/blog").map(|p| p.name),
            Some("Telegram")
        );
        assert_eq!(
            detect_platform("https://redd.it/abc123").map(|p| p.name),
            Some("Reddit")
        );
        assert_eq!(
            detect_platform("https://i.redd.it/image.png").map(|p| p.name),
            Some("Reddit")
        );
    }
}
