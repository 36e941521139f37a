//! Free-text filtering of entity lists.
//!
//! Runs on every keystroke in the search box, so it is synchronous, pure and
//! linear in `rows x fields`.

use crate::entity::{EntityKind, SearchField};

/// Something with a fixed set of text fields that search looks at.
pub trait Searchable {
    /// The fields to search, in match order.
    fn search_fields(&self) -> &'static [SearchField];

    /// Text of one field, or `None` if this type has no such field.
    fn field_text(&self, field: SearchField) -> Option<&str>;

    /// Returns true if any search field contains the query.
    fn matches(&self, query: &SearchQuery) -> bool {
        query.is_empty()
            || self
                .search_fields()
                .iter()
                .filter_map(|field| self.field_text(*field))
                .any(|text| query.matches_text(text))
    }
}

/// A normalized search box query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    /// Normalizes raw input: surrounding whitespace is dropped and case folded.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    /// Returns true if the query matches everything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// The normalized needle.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Case-insensitive substring test.
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        self.is_empty() || text.to_lowercase().contains(&self.needle)
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Returns the rows matching `query`, in their original order.
///
/// An empty or whitespace-only query returns every row.
#[must_use]
pub fn filter<'a, T: Searchable>(rows: &'a [T], query: &str) -> Vec<&'a T> {
    let query = SearchQuery::new(query);
    if query.is_empty() {
        return rows.iter().collect();
    }
    rows.iter().filter(|row| row.matches(&query)).collect()
}

/// Header line for a filtered list: "2 of 5 contacts displayed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    /// Rows left after filtering.
    pub shown: usize,
    /// Rows before filtering.
    pub total: usize,
    /// What the rows are.
    pub kind: EntityKind,
}

impl ListSummary {
    /// Builds a summary for a filtered list.
    #[must_use]
    pub const fn new(kind: EntityKind, shown: usize, total: usize) -> Self {
        Self { shown, total, kind }
    }
}

impl std::fmt::Display for ListSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} {} displayed",
            self.shown,
            self.total,
            self.kind.plural()
        )
    }
}
