//! HTML → readable text and page metadata.
//!
//! Two independent passes over the same document:
//!
//! * [`extract_readable_text`] picks the most text-heavy content container
//!   from a priority list of selectors and normalises it to plain text.
//! * [`extract_metadata`] walks fallback chains of `<meta>` tags and common
//!   markup for title, author, date, description, image and site name.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

/// Content containers, most specific first.
pub const CONTENT_SELECTORS: [&str; 9] = [
    "article",
    "[role=\"main\"]",
    "main",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    "#content",
    ".main-content",
];

/// Below this many characters a container is not trusted and `<body>` is used.
const MIN_CONTAINER_CHARS: usize = 100;

static RE_SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static RE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup from an HTML fragment, leaving collapsed plain text.
pub fn html_to_text(html: &str) -> String {
    let s = RE_SCRIPT.replace_all(html, " ");
    let s = RE_STYLE.replace_all(&s, " ");
    let s = RE_TAG.replace_all(&s, " ");
    let s = decode_entities(&s);
    RE_WS.replace_all(&s, " ").trim().to_string()
}

fn decode_entities(s: &str) -> String {
    // `&amp;` last so "&amp;lt;" stays "&lt;".
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Extract the main readable text of a page.
pub fn extract_readable_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut best = String::new();
    for selector in CONTENT_SELECTORS {
        let Ok(sel) = Selector::parse(selector) else {
            continue;
        };
        // Outermost match only; nested containers would repeat their text.
        let Some(element) = document.select(&sel).next() else {
            continue;
        };
        let text = html_to_text(&element.inner_html());
        if text.chars().count() > best.chars().count() {
            best = text;
        }
    }

    if best.chars().count() >= MIN_CONTAINER_CHARS {
        return best;
    }

    Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|body| html_to_text(&body.inner_html()))
        .unwrap_or_else(|| html_to_text(html))
}

/// Metadata scraped from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
}

/// Extract page metadata. `url` supplies the host when no site name is declared.
pub fn extract_metadata(html: &str, url: Option<&str>) -> PageMetadata {
    let doc = Html::parse_document(html);

    let title = first_text(&doc, "title")
        .or_else(|| meta_property(&doc, "og:title"))
        .or_else(|| first_text(&doc, "h1"))
        .unwrap_or_else(|| "Untitled".to_string());

    let description = meta_name(&doc, "description").or_else(|| meta_property(&doc, "og:description"));

    let author = meta_name(&doc, "author")
        .or_else(|| meta_property(&doc, "article:author"))
        .or_else(|| first_text(&doc, ".author"))
        .or_else(|| first_text(&doc, "[rel=\"author\"]"));

    let published_date = meta_property(&doc, "article:published_time")
        .or_else(|| first_attr(&doc, "time[datetime]", "datetime"))
        .or_else(|| first_text(&doc, "time"));

    let image = meta_property(&doc, "og:image").or_else(|| meta_name(&doc, "twitter:image"));

    let site_name = meta_property(&doc, "og:site_name").or_else(|| {
        url.and_then(|u| reqwest::Url::parse(u).ok())
            .and_then(|u| u.host_str().map(str::to_string))
    });

    PageMetadata {
        title,
        author,
        published_date,
        description,
        image,
        site_name,
    }
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let el = doc.select(&sel).next()?;
    let t = el.text().collect::<Vec<_>>().join(" ");
    let t = RE_WS.replace_all(&t, " ").trim().to_string();
    (!t.is_empty()).then_some(t)
}

fn first_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let el = doc.select(&sel).next()?;
    let v = el.value().attr(attr)?.trim().to_string();
    (!v.is_empty()).then_some(v)
}

fn meta_name(doc: &Html, name: &str) -> Option<String> {
    first_attr(doc, &format!("meta[name=\"{name}\"]"), "content")
}

fn meta_property(doc: &Html, property: &str) -> Option<String> {
    first_attr(doc, &format!("meta[property=\"{property}\"]"), "content")
}
