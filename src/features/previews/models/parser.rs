//! Open Graph and Twitter card extraction from raw HTML.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;

lazy_static! {
    static ref META_TAG: Regex = Regex::new(r"(?is)<meta\b([^>]*)>").unwrap();
    static ref ATTRIBUTE: Regex =
        Regex::new(r#"(?is)([a-z][a-z0-9:_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
            .unwrap();
    static ref TITLE_TAG: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    static ref NUMERIC_ENTITY: Regex = Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap();
}

/// Metadata extracted from a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_type: Option<String>,
    pub og_site_name: Option<String>,
    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
}

impl PageMetadata {
    /// Image shown on link cards
    pub fn preview_image(&self) -> Option<String> {
        self.og_image.clone().or_else(|| self.twitter_image.clone())
    }
}

fn decode_entities(raw: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(raw, |caps: &regex::Captures| {
        let code = &caps[1];
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        parsed
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn clean(raw: &str) -> Option<String> {
    let decoded = decode_entities(raw);
    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// `property`/`name` → `content` for every meta tag; the first occurrence wins
fn meta_contents(html: &str) -> HashMap<String, String> {
    let mut contents = HashMap::new();

    for tag in META_TAG.captures_iter(html) {
        let mut key: Option<String> = None;
        let mut content: Option<String> = None;

        for attr in ATTRIBUTE.captures_iter(&tag[1]) {
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            match attr[1].to_ascii_lowercase().as_str() {
                "property" | "name" if key.is_none() => key = Some(value.to_ascii_lowercase()),
                "content" => content = Some(value),
                _ => {}
            }
        }

        if let (Some(key), Some(content)) = (key, content) {
            contents.entry(key).or_insert(content);
        }
    }

    contents
}

/// Image references are resolved against the page URL; unresolvable ones are dropped
fn resolve_image(base: &Url, reference: Option<String>) -> Option<String> {
    base.join(&reference?).ok().map(String::from)
}

/// Extract preview metadata from a page fetched from `base`.
///
/// `og:title` falls back to `<title>` and `og:description` to the plain
/// `description` meta tag.
pub fn extract_metadata(html: &str, base: &Url) -> PageMetadata {
    let meta = meta_contents(html);
    let get = |key: &str| meta.get(key).and_then(|v| clean(v));

    let title = TITLE_TAG.captures(html).and_then(|caps| clean(&caps[1]));

    PageMetadata {
        og_title: get("og:title").or(title),
        og_description: get("og:description").or_else(|| get("description")),
        og_image: resolve_image(base, get("og:image")),
        og_type: get("og:type"),
        og_site_name: get("og:site_name"),
        twitter_card: get("twitter:card"),
        twitter_title: get("twitter:title"),
        twitter_description: get("twitter:description"),
        twitter_image: resolve_image(base, get("twitter:image")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_open_graph_tags() {
        let html = r#"
            <html><head>
              <title>Fallback title</title>
              <meta property="og:title" content="Rust &amp; Friends">
              <meta content="A page about Rust" property="og:description" />
              <meta property="og:image" content="https://cdn.example.com/card.png">
              <meta property="og:type" content="website">
              <meta property="og:site_name" content='Example'>
              <meta name="twitter:card" content="summary_large_image">
            </head></html>
        "#;

        let meta = extract_metadata(html, &base());
        assert_eq!(meta.og_title.as_deref(), Some("Rust & Friends"));
        assert_eq!(meta.og_description.as_deref(), Some("A page about Rust"));
        assert_eq!(meta.og_type.as_deref(), Some("website"));
        assert_eq!(meta.og_site_name.as_deref(), Some("Example"));
        assert_eq!(meta.twitter_card.as_deref(), Some("summary_large_image"));
        assert_eq!(
            meta.preview_image().as_deref(),
            Some("https://cdn.example.com/card.png")
        );
    }

    #[test]
    fn test_fallbacks() {
        let html = r#"
            <head>
              <TITLE>  Plain
                 page </TITLE>
              <meta name="Description" content="Plain description">
              <meta name="twitter:image" content="https://example.com/tw.jpg">
            </head>
        "#;

        let meta = extract_metadata(html, &base());
        assert_eq!(meta.og_title.as_deref(), Some("Plain page"));
        assert_eq!(meta.og_description.as_deref(), Some("Plain description"));
        assert_eq!(meta.og_image, None);
        assert_eq!(
            meta.preview_image().as_deref(),
            Some("https://example.com/tw.jpg")
        );
    }

    #[test]
    fn test_first_occurrence_wins_and_entities_decode() {
        let html = r#"
            <meta property="og:title" content="It&#39;s &#x263A;">
            <meta property="og:title" content="Second">
            <meta property="og:description" content="   ">
        "#;

        let meta = extract_metadata(html, &base());
        assert_eq!(meta.og_title.as_deref(), Some("It's ☺"));
        assert_eq!(meta.og_description, None);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_metadata("", &base()), PageMetadata::default());
    }

    #[test]
    fn test_relative_images_resolve_against_page() {
        let html = r#"
            <meta property="og:image" content="/static/card.png">
            <meta name="twitter:image" content="thumb.jpg">
        "#;

        let meta = extract_metadata(html, &base());
        assert_eq!(
            meta.og_image.as_deref(),
            Some("https://example.com/static/card.png")
        );
        assert_eq!(
            meta.twitter_image.as_deref(),
            Some("https://example.com/blog/thumb.jpg")
        );

        let protocol_relative = extract_metadata(
            r#"<meta property="og:image" content="//cdn.example.net/a.png">"#,
            &base(),
        );
        assert_eq!(
            protocol_relative.og_image.as_deref(),
            Some("https://cdn.example.net/a.png")
        );
    }
}
