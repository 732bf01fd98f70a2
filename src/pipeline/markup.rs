//! Minimal, line-oriented Markdown → HTML converter.
//!
//! Covers what the models actually produce: ATX headings, `**bold**`,
//! `*italic*`, `[text](url)` links, `-`/`*` and `1.` list items, `>` quotes,
//! horizontal rules and paragraphs. No nesting, tables or code blocks.
//!
//! All text is HTML-escaped before inline markup is applied. Headings get
//! `id="heading-N"` numbered by the same scan as
//! [`crate::pipeline::outline::build_outline`], so outline links resolve.

use crate::pipeline::outline::{heading_id, parse_heading};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+?)\*\*").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());
static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*+][ \t]+(.*)$").unwrap());
static RE_ORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+[.)][ \t]+(.*)$").unwrap());
static RE_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*>[ \t]?(.*)$").unwrap());
static RE_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").unwrap());

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only these schemes become clickable links.
fn is_safe_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || lower.starts_with('#')
}

fn emphasis(escaped: &str) -> String {
    let s = RE_BOLD.replace_all(escaped, "<strong>$1</strong>");
    RE_ITALIC.replace_all(&s, "<em>$1</em>").into_owned()
}

/// Apply inline markup to one line of text. Input is raw, output is HTML.
///
/// Emphasis is applied to the text between links and to link labels, never
/// to an `href`.
pub fn inline(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut rest = 0;

    for caps in RE_LINK.captures_iter(&escaped) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&emphasis(&escaped[rest..whole.start()]));
        let label = emphasis(&caps[1]);
        let href = &caps[2];
        if is_safe_href(href) {
            out.push_str(&format!("<a href=\"{href}\">{label}</a>"));
        } else {
            out.push_str(&label);
        }
        rest = whole.end();
    }
    out.push_str(&emphasis(&escaped[rest..]));
    out
}

/// Like [`inline`], but links collapse to their label. For text that is
/// itself placed inside an anchor, such as outline entries.
pub fn inline_unlinked(text: &str) -> String {
    let escaped = escape_html(text);
    emphasis(&RE_LINK.replace_all(&escaped, "$1"))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

#[derive(Default)]
struct Writer {
    out: String,
    paragraph: Vec<String>,
    quote: Vec<String>,
    list: Option<ListKind>,
    headings: usize,
}

impl Writer {
    fn close_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            self.out.push_str("<p>");
            self.out.push_str(&self.paragraph.join("<br>\n"));
            self.out.push_str("</p>\n");
            self.paragraph.clear();
        }
    }

    fn close_quote(&mut self) {
        if !self.quote.is_empty() {
            self.out.push_str("<blockquote><p>");
            self.out.push_str(&self.quote.join("<br>\n"));
            self.out.push_str("</p></blockquote>\n");
            self.quote.clear();
        }
    }

    fn close_list(&mut self) {
        if let Some(kind) = self.list.take() {
            self.out.push_str(&format!("</{}>\n", kind.tag()));
        }
    }

    fn close_all(&mut self) {
        self.close_paragraph();
        self.close_quote();
        self.close_list();
    }

    fn list_item(&mut self, kind: ListKind, text: &str) {
        self.close_paragraph();
        self.close_quote();
        if self.list != Some(kind) {
            self.close_list();
            self.out.push_str(&format!("<{}>\n", kind.tag()));
            self.list = Some(kind);
        }
        self.out.push_str(&format!("<li>{}</li>\n", inline(text)));
    }
}

/// Convert Markdown text to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut w = Writer::default();

    for line in markdown.lines() {
        if line.trim().is_empty() {
            w.close_all();
        } else if let Some((level, title)) = parse_heading(line) {
            w.close_all();
            w.headings += 1;
            w.out.push_str(&format!(
                "<h{level} id=\"{}\">{}</h{level}>\n",
                heading_id(w.headings),
                inline(title)
            ));
        } else if RE_RULE.is_match(line) {
            w.close_all();
            w.out.push_str("<hr>\n");
        } else if let Some(caps) = RE_BULLET.captures(line) {
            w.list_item(ListKind::Bullet, &caps[1]);
        } else if let Some(caps) = RE_ORDERED.captures(line) {
            w.list_item(ListKind::Ordered, &caps[1]);
        } else if let Some(caps) = RE_QUOTE.captures(line) {
            w.close_paragraph();
            w.close_list();
            w.quote.push(inline(&caps[1]));
        } else {
            w.close_quote();
            w.close_list();
            w.paragraph.push(inline(line.trim()));
        }
    }
    w.close_all();

    w.out
}

/// Render plain text as escaped paragraphs, one per non-empty line.
pub fn plain_text_to_html(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("<p>{}</p>\n", escape_html(l)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::outline::build_outline;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            inline("**bold** and *italic* and [link](https://rust-lang.org)"),
            "<strong>bold</strong> and <em>italic</em> and <a href=\"https://rust-lang.org\">link</a>"
        );
    }

    #[test]
    fn unsafe_link_keeps_only_label() {
        assert_eq!(inline("[click](javascript:alert(1))"), "click)");
        assert_eq!(inline("[x](ftp://host/file)"), "x");
    }

    #[test]
    fn emphasis_never_touches_href() {
        assert_eq!(
            inline("[docs](https://example.com/a*b*c)"),
            "<a href=\"https://example.com/a*b*c\">docs</a>"
        );
        assert_eq!(
            inline("see [x](https://example.com/**y**) and *z*"),
            "see <a href=\"https://example.com/**y**\">x</a> and <em>z</em>"
        );
    }

    #[test]
    fn link_label_keeps_emphasis() {
        assert_eq!(
            inline("[**Rust** book](https://doc.rust-lang.org/book/)"),
            "<a href=\"https://doc.rust-lang.org/book/\"><strong>Rust</strong> book</a>"
        );
    }

    #[test]
    fn unlinked_inline_drops_anchors() {
        assert_eq!(
            inline_unlinked("**Setup** with [cargo](https://doc.rust-lang.org/cargo/)"),
            "<strong>Setup</strong> with cargo"
        );
        assert_eq!(inline_unlinked("A <b> & *B*"), "A &lt;b&gt; &amp; <em>B</em>");
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = markdown_to_html("<script>alert(1)</script>");
        assert_eq!(html, "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>\n");
    }

    #[test]
    fn heading_ids_match_outline() {
        let md = "# Intro\ntext\n## Details\n### Deep\n# End";
        let html = markdown_to_html(md);
        let toc = build_outline(md);

        let mut ids = Vec::new();
        let mut stack: Vec<&crate::types::TocItem> = toc.iter().rev().collect();
        while let Some(item) = stack.pop() {
            ids.push(item.id.clone());
            stack.extend(item.children.iter().rev());
        }
        assert_eq!(ids.len(), 4);
        for id in ids {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing anchor {id}");
        }
        assert!(html.contains("<h2 id=\"heading-2\">Details</h2>"));
    }

    #[test]
    fn lists_quotes_and_paragraphs() {
        let md = "Intro line\nsecond line\n\n- one\n- two\n\n1. first\n2. second\n\n> quoted\n\n---\nend";
        let html = markdown_to_html(md);
        assert_eq!(
            html,
            "<p>Intro line<br>\nsecond line</p>\n\
             <ul>\n<li>one</li>\n<li>two</li>\n</ul>\n\
             <ol>\n<li>first</li>\n<li>second</li>\n</ol>\n\
             <blockquote><p>quoted</p></blockquote>\n\
             <hr>\n\
             <p>end</p>\n"
        );
    }

    #[test]
    fn switching_list_kind_closes_previous_list() {
        let html = markdown_to_html("- a\n1. b");
        assert_eq!(html, "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n");
    }

    #[test]
    fn test_plain_text_to_html() {
        assert_eq!(
            plain_text_to_html("one\n\n  two & three  \n"),
            "<p>one</p>\n<p>two &amp; three</p>\n"
        );
    }
}
