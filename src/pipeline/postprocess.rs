//! Deterministic tidy-up of model-generated Markdown.
//!
//! Models occasionally wrap their answer in a ` ```markdown ` fence, emit
//! CRLF line endings, or glue a heading to the paragraph above it. The tidy
//! pass fixes such quirks without touching the wording. It runs before the
//! outline is built, so heading detection sees clean input.

use crate::pipeline::outline::parse_heading;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that render as nothing but break heading and list detection.
const INVISIBLE: [char; 6] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{00AD}'];

static RE_ANSWER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)?[ \t]*\r?\n(.*?)\r?\n```\s*$").unwrap());

/// Tidy raw model output for storage and indexing.
///
/// In order: unwrap an answer-wide fence, drop invisible characters, then
/// rebuild the text line by line with LF endings, no trailing whitespace,
/// at most one blank line in a row and a blank line before every heading.
/// The result is trimmed.
pub fn tidy_markdown(raw: &str) -> String {
    let unwrapped = unwrap_answer_fence(raw);
    let visible: String = unwrapped.chars().filter(|c| !INVISIBLE.contains(c)).collect();
    relayout_lines(&visible).trim().to_string()
}

fn unwrap_answer_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    RE_ANSWER_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |body| body.as_str())
}

fn relayout_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    // `str::lines` leaves a lone `\r` in place, so split on both endings.
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    for line in unified.split('\n').map(str::trim_end) {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }

        if !out.is_empty() {
            let gap = if parse_heading(line).is_some() {
                2
            } else {
                blank_run.min(1) + 1
            };
            out.extend(std::iter::repeat('\n').take(gap));
        }
        out.push_str(line);
        blank_run = 0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_fence_is_unwrapped() {
        assert_eq!(unwrap_answer_fence("```markdown\n# Hello\nWorld\n```"), "# Hello\nWorld");
        assert_eq!(unwrap_answer_fence("```md\n# Hello\n```\n"), "# Hello");
        assert_eq!(unwrap_answer_fence("```\nplain\n```"), "plain");
        assert_eq!(unwrap_answer_fence("# Hello\nWorld"), "# Hello\nWorld");
    }

    #[test]
    fn inner_code_blocks_survive() {
        let text = "Intro\n\n```rust\nfn main() {}\n```\n\nOutro";
        assert_eq!(tidy_markdown(text), text);
    }

    #[test]
    fn line_endings_and_trailing_space() {
        assert_eq!(tidy_markdown("a  \r\nb\rc\t"), "a\nb\nc");
    }

    #[test]
    fn blank_runs_collapse_to_one() {
        assert_eq!(tidy_markdown("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(tidy_markdown("a\n   \n\t\nb"), "a\n\nb");
        assert_eq!(tidy_markdown("a\nb"), "a\nb");
    }

    #[test]
    fn headings_get_a_blank_line_before() {
        assert_eq!(
            tidy_markdown("some text\n## Heading\nmore text"),
            "some text\n\n## Heading\nmore text"
        );
        assert_eq!(tidy_markdown("line\n#rustlang rocks"), "line\n#rustlang rocks");
    }

    #[test]
    fn invisible_characters_are_dropped() {
        assert_eq!(
            tidy_markdown("hello\u{200B}world\u{FEFF}foo\u{00AD}bar"),
            "helloworldfoobar"
        );
        assert_eq!(tidy_markdown("\u{FEFF}# Title"), "# Title");
    }

    #[test]
    fn model_reply_is_tidied_end_to_end() {
        let input = "```markdown\n# Title\r\n\r\nSome text   \n\n\n\n\n## Section\nBody\n```";
        assert_eq!(tidy_markdown(input), "# Title\n\nSome text\n\n## Section\nBody");
    }
}
