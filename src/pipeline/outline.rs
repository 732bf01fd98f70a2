//! Heading indexer: builds the table of contents from Markdown headings.
//!
//! A heading is a line of 1–6 `#` characters, whitespace, then a title.
//! Ids are assigned in scan order (`heading-1`, `heading-2`, …) and never
//! derived from the title, so the converter in [`crate::pipeline::markup`]
//! can emit matching anchors by running the same scan.

use crate::types::TocItem;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*\S)\s*$").unwrap());

/// Recognise a heading line, returning its level and title.
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = RE_HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let title = caps.get(2)?.as_str().trim();
    Some((level, title))
}

/// Anchor id of the `n`th heading (1-based).
pub fn heading_id(n: usize) -> String {
    format!("heading-{n}")
}

/// Build the nested outline of `text` in document order.
///
/// Uses a stack: before pushing an item, every open node whose level is
/// greater than or equal to the item's level is closed into its parent.
/// Text without headings yields an empty outline.
pub fn build_outline(text: &str) -> Vec<TocItem> {
    let flat = text
        .lines()
        .filter_map(parse_heading)
        .enumerate()
        .map(|(i, (level, title))| TocItem {
            id: heading_id(i + 1),
            title: title.to_string(),
            level,
            children: Vec::new(),
        });

    let mut roots = Vec::new();
    let mut stack: Vec<TocItem> = Vec::new();

    for item in flat {
        while stack.last().is_some_and(|top| top.level >= item.level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(item);
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

fn close_top(stack: &mut Vec<TocItem>, roots: &mut Vec<TocItem>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}
