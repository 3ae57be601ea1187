//! Complaint records and the values used to create them.
//!
//! Complaints are owned by the backend. The client holds a transient copy per
//! session and replaces entries wholesale with whatever the server returns.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Validation errors for complaint inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintValidationError {
    /// No category was chosen.
    MissingCategory,
    /// Category text did not match a known category.
    UnknownCategory {
        /// The rejected input.
        value: String,
    },
    /// Status text did not match a known status.
    UnknownStatus {
        /// The rejected input.
        value: String,
    },
    /// Title was blank once trimmed.
    EmptyTitle,
    /// Description was blank once trimmed.
    EmptyDescription,
}

impl fmt::Display for ComplaintValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "category must be selected"),
            Self::UnknownCategory { value } => write!(
                f,
                "unknown category '{value}'; expected one of {}",
                Category::ALL.map(Category::as_str).join(", ")
            ),
            Self::UnknownStatus { value } => write!(
                f,
                "unknown status '{value}'; expected one of {}",
                ComplaintStatus::ALL.map(ComplaintStatus::as_str).join(", ")
            ),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
        }
    }
}

impl std::error::Error for ComplaintValidationError {}

/// Server-assigned complaint identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(i64);

impl ComplaintId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ComplaintId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Maintenance area a complaint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Wiring, lights, fans, sockets.
    Electrical,
    /// Taps, drains, water supply.
    Plumbing,
    /// Beds, desks, cupboards.
    Furniture,
    /// Housekeeping and sanitation.
    Cleaning,
    /// Anything else.
    Others,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Self; 5] = [
        Self::Electrical,
        Self::Plumbing,
        Self::Furniture,
        Self::Cleaning,
        Self::Others,
    ];

    /// Wire and display representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electrical => "Electrical",
            Self::Plumbing => "Plumbing",
            Self::Furniture => "Furniture",
            Self::Cleaning => "Cleaning",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ComplaintValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ComplaintValidationError::MissingCategory);
        }
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ComplaintValidationError::UnknownCategory {
                value: s.to_owned(),
            })
    }
}

/// Lifecycle state of a complaint. Only administrators change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplaintStatus {
    /// Newly submitted; the initial state.
    #[default]
    Pending,
    /// Being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Fixed.
    Resolved,
    /// Declined by an administrator.
    Rejected,
}

impl ComplaintStatus {
    /// Every status in display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Resolved,
        Self::Rejected,
    ];

    /// Wire and display representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = ComplaintValidationError;

    /// Case-insensitive; `in progress`, `in-progress`, and `in_progress` parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ComplaintStatus::unknown(s))
    }
}

impl ComplaintStatus {
    fn unknown(value: &str) -> ComplaintValidationError {
        ComplaintValidationError::UnknownStatus {
            value: value.to_owned(),
        }
    }
}

/// A maintenance issue raised by a student.
///
/// ## Invariants
/// - exactly one [`ComplaintStatus`] at any time.
/// - `id`, `owner`, and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Complaint {
    id: ComplaintId,
    owner: Option<UserId>,
    title: String,
    category: Category,
    description: String,
    status: ComplaintStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// Start building a complaint with its server-assigned identity.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use portal::domain::{Category, Complaint, ComplaintId, ComplaintStatus};
    ///
    /// let complaint = Complaint::builder(ComplaintId::new(7), Utc::now())
    ///     .title("Leaking tap")
    ///     .category(Category::Plumbing)
    ///     .build();
    /// assert_eq!(complaint.status(), ComplaintStatus::Pending);
    /// ```
    pub fn builder(id: ComplaintId, created_at: DateTime<Utc>) -> ComplaintBuilder {
        ComplaintBuilder {
            complaint: Self {
                id,
                owner: None,
                title: String::new(),
                category: Category::Others,
                description: String::new(),
                status: ComplaintStatus::Pending,
                created_at,
                updated_at: None,
            },
        }
    }

    /// Server-assigned identifier.
    pub fn id(&self) -> ComplaintId {
        self.id
    }

    /// Submitting user, when the server reports it.
    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Short summary.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Maintenance area.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Free-text detail; empty when the server had none.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    /// Creation time assigned by the server.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the most recent server-side change.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Builder for [`Complaint`].
#[derive(Debug, Clone)]
pub struct ComplaintBuilder {
    complaint: Complaint,
}

impl ComplaintBuilder {
    /// Set the owner.
    #[must_use]
    pub fn owner(mut self, owner: UserId) -> Self {
        self.complaint.owner = Some(owner);
        self
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.complaint.title = title.into();
        self
    }

    /// Set the category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.complaint.category = category;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.complaint.description = description.into();
        self
    }

    /// Set the status.
    #[must_use]
    pub fn status(mut self, status: ComplaintStatus) -> Self {
        self.complaint.status = status;
        self
    }

    /// Set the last-updated timestamp.
    #[must_use]
    pub fn updated_at(mut self, updated_at: Option<DateTime<Utc>>) -> Self {
        self.complaint.updated_at = updated_at;
        self
    }

    /// Finish building.
    pub fn build(self) -> Complaint {
        self.complaint
    }
}

/// Validated payload for the create-complaint endpoint.
///
/// ## Invariants
/// - `title` and `description` are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComplaint {
    category: Category,
    title: String,
    description: String,
}

impl NewComplaint {
    /// Validate raw form values.
    pub fn try_new(
        category: Category,
        title: &str,
        description: &str,
    ) -> Result<Self, ComplaintValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ComplaintValidationError::EmptyTitle);
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ComplaintValidationError::EmptyDescription);
        }
        Ok(Self {
            category,
            title: title.to_owned(),
            description: description.to_owned(),
        })
    }

    /// Maintenance area.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Short summary.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-text detail.
    pub fn description(&self) -> &str {
        &self.description
    }
}
