use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slugs
    /// Must be lowercase alphanumeric with single hyphens between segments
    /// - Valid: "my-tag", "ai", "this-week", "web3"
    /// - Invalid: "-tag", "tag-", "my--tag", "My-Tag", "my_tag"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for hex colors: "#3b82f6" or "#fff"
    pub static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9-]").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Build a URL slug from a display name.
///
/// Lowercases, turns whitespace runs into hyphens and strips everything outside
/// `[a-z0-9-]`. Repeated and edge hyphens are collapsed so the result always
/// satisfies [`SLUG_REGEX`] unless it is empty.
pub fn slugify(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lower, "-");
    let stripped = NON_SLUG_CHARS.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUN.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("My Tag!"), "my-tag");
    }

    #[test]
    fn test_slugify_whitespace_and_case() {
        assert_eq!(slugify("  AI   News  "), "ai-news");
        assert_eq!(slugify("This Week"), "this-week");
        assert_eq!(slugify("Tabs\tand\nnewlines"), "tabs-and-newlines");
    }

    #[test]
    fn test_slugify_collapses_hyphens() {
        assert_eq!(slugify("Tools - Dev"), "tools-dev");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn test_slugify_non_ascii_dropped() {
        assert_eq!(slugify("Café & Bar"), "caf-bar");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_output_matches_slug_regex() {
        for name in ["My Tag!", "Web 3.0", "C++ / Rust", "x"] {
            let slug = slugify(name);
            assert!(SLUG_REGEX.is_match(&slug), "{:?} -> {:?}", name, slug);
        }
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-tag"));
        assert!(!SLUG_REGEX.is_match("tag-"));
        assert!(!SLUG_REGEX.is_match("my--tag"));
        assert!(!SLUG_REGEX.is_match("My-Tag"));
        assert!(!SLUG_REGEX.is_match("my_tag"));
        assert!(!SLUG_REGEX.is_match(""));
    }

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#3b82f6"));
        assert!(HEX_COLOR_REGEX.is_match("#FFF"));
        assert!(!HEX_COLOR_REGEX.is_match("3b82f6"));
        assert!(!HEX_COLOR_REGEX.is_match("#3b82f"));
        assert!(!HEX_COLOR_REGEX.is_match("hsl(var(--primary))"));
    }
}
