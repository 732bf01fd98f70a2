//! Reference list for validation reports.
//!
//! Only the source article itself is cited. The enhanced text is accepted
//! so richer policies can mine it later without changing call sites.

use crate::types::{Citation, ExtractedContent};

pub const SOURCE_DESCRIPTION: &str = "Original source article";

/// Citations for `original`: one entry for its URL, or none without a URL.
pub fn build_citations(original: &ExtractedContent, _enhanced: &str) -> Vec<Citation> {
    let Some(ref url) = original.url else {
        return Vec::new();
    };

    vec![Citation {
        id: format!("cite-{}", uuid::Uuid::new_v4().simple()),
        title: original.title.clone(),
        url: Some(url.clone()),
        author: original.author.clone(),
        published_date: original.published_date.clone(),
        description: Some(SOURCE_DESCRIPTION.to_string()),
    }]
}
