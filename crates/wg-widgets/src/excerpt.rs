//! Read-more toggle for long announcement text

use std::borrow::Cow;

pub const DEFAULT_EXCERPT_CHARS: usize = 200;

pub const READ_MORE: &str = "Read more";
pub const READ_LESS: &str = "Read less";

/// Text that collapses to its first `limit` characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    full: String,
    limit: usize,
    expanded: bool,
}

impl Excerpt {
    /// Starts collapsed
    pub fn new(full: impl Into<String>, limit: usize) -> Self {
        Self {
            full: full.into(),
            limit,
            expanded: false,
        }
    }

    pub fn with_default_limit(full: impl Into<String>) -> Self {
        Self::new(full, DEFAULT_EXCERPT_CHARS)
    }

    /// Whether there is anything hidden when collapsed
    pub fn is_truncatable(&self) -> bool {
        self.full.chars().count() > self.limit
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Text to show in the current state
    pub fn displayed(&self) -> Cow<'_, str> {
        if self.expanded || !self.is_truncatable() {
            return Cow::Borrowed(&self.full);
        }

        let cut = self
            .full
            .char_indices()
            .nth(self.limit)
            .map(|(idx, _)| idx)
            .unwrap_or(self.full.len());
        Cow::Owned(format!("{}...", &self.full[..cut]))
    }

    /// Label for the toggle button
    pub fn label(&self) -> &'static str {
        if self.expanded { READ_LESS } else { READ_MORE }
    }

    /// Flip between collapsed and expanded; returns the new button label
    pub fn toggle(&mut self) -> &'static str {
        self.expanded = !self.expanded;
        self.label()
    }

    pub fn full_text(&self) -> &str {
        &self.full
    }
}
