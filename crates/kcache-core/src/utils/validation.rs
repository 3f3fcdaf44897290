//! Validation Utilities

use crate::error::{Error, Result};

/// Reject empty or whitespace-only learning content
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::invalid_input("content must not be empty"));
    }
    Ok(())
}

/// Trim tags, drop empties and repeated tags, keep first-seen order
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
