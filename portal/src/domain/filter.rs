//! Derived complaint view.
//!
//! The filtered view is computed on demand from the full list plus the
//! current query. It holds borrowed references only and is never stored.

use std::fmt;
use std::str::FromStr;

use super::complaint::{Complaint, ComplaintStatus, ComplaintValidationError};

/// Status predicate applied to the complaint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Accept every status.
    #[default]
    All,
    /// Accept only the given status.
    Only(ComplaintStatus),
}

impl StatusFilter {
    /// Whether `status` passes this filter.
    pub fn accepts(self, status: ComplaintStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ComplaintValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Search text plus status predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplaintQuery {
    search: String,
    status: StatusFilter,
}

impl ComplaintQuery {
    /// Build a query from its parts.
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Raw search text as typed.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Status predicate.
    pub fn status(&self) -> StatusFilter {
        self.status
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Replace the status predicate.
    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    /// Whether the query narrows the list at all.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.status != StatusFilter::All
    }

    /// Whether `complaint` satisfies both predicates.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.accepts(complaint.status()) && matches_search(complaint, &self.search)
    }
}

fn matches_search(complaint: &Complaint, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [
        complaint.title(),
        complaint.description(),
        complaint.category().as_str(),
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Complaints from `complaints` that satisfy `query`, in source order.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use portal::domain::{derive_view, Category, Complaint, ComplaintId, ComplaintQuery};
///
/// let list = vec![
///     Complaint::builder(ComplaintId::new(1), Utc::now())
///         .title("Fan")
///         .category(Category::Electrical)
///         .build(),
///     Complaint::builder(ComplaintId::new(2), Utc::now())
///         .title("Tap")
///         .category(Category::Plumbing)
///         .build(),
/// ];
/// let query = ComplaintQuery::new("plumb", Default::default());
/// let view = derive_view(&list, &query);
/// assert_eq!(view.len(), 1);
/// assert_eq!(view[0].title(), "Tap");
/// ```
pub fn derive_view<'a>(complaints: &'a [Complaint], query: &ComplaintQuery) -> Vec<&'a Complaint> {
    complaints
        .iter()
        .filter(|complaint| query.matches(complaint))
        .collect()
}
