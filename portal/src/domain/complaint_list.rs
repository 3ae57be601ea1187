//! Complaint list controller.
//!
//! Owns the authoritative in-memory copy of the caller's complaints, the
//! search query, and the new-complaint draft. The displayed view is always
//! derived from the list and query on demand. Mutations round-trip through
//! [`PortalApi`] and touch local state only after the server succeeds.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::PortalApi;
use crate::domain::{
    Category, Complaint, ComplaintId, ComplaintQuery, ComplaintStatus,
    ComplaintValidationError, Error, NewComplaint, Session, StatusFilter, derive_view,
};

/// Heading shown to administrators.
pub const ADMIN_HEADING: &str = "Manage Complaints";
/// Heading shown to students.
pub const STUDENT_HEADING: &str = "My Complaints";
/// Empty view while a search or status filter is active.
pub const NO_MATCHES_MESSAGE: &str = "No complaints match your search criteria";
/// Empty view with no filters applied.
pub const NO_COMPLAINTS_MESSAGE: &str = "No complaints found. Submit a new one to get started.";

/// Unsubmitted new-complaint form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintDraft {
    /// Chosen category, if any.
    pub category: Option<Category>,
    /// Title text.
    pub title: String,
    /// Description text.
    pub description: String,
}

impl ComplaintDraft {
    fn validate(&self) -> Result<NewComplaint, ComplaintValidationError> {
        let category = self
            .category
            .ok_or(ComplaintValidationError::MissingCategory)?;
        NewComplaint::try_new(category, &self.title, &self.description)
    }
}

/// Controller for the dashboard complaint list.
pub struct ComplaintListController<A> {
    api: Arc<A>,
    session: Session,
    complaints: Vec<Complaint>,
    query: ComplaintQuery,
    draft: ComplaintDraft,
    panel_open: bool,
    submitting: bool,
    error: Option<Error>,
}

impl<A> ComplaintListController<A> {
    /// Wrap a freshly fetched list for `session`.
    pub fn new(api: Arc<A>, session: Session, complaints: Vec<Complaint>) -> Self {
        Self {
            api,
            session,
            complaints,
            query: ComplaintQuery::default(),
            draft: ComplaintDraft::default(),
            panel_open: false,
            submitting: false,
            error: None,
        }
    }

    /// Session the controller acts for.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Full list in server order, with local submissions prepended.
    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    /// Look up one complaint in the local list.
    pub fn find(&self, id: ComplaintId) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id() == id)
    }

    /// Complaints passing the current query, in list order.
    pub fn view(&self) -> Vec<&Complaint> {
        derive_view(&self.complaints, &self.query)
    }

    /// Current query.
    pub fn query(&self) -> &ComplaintQuery {
        &self.query
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.set_search(search);
    }

    /// Replace the status filter.
    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.query.set_status(status);
    }

    /// Role-dependent page heading.
    pub fn heading(&self) -> &'static str {
        if self.session.is_admin() {
            ADMIN_HEADING
        } else {
            STUDENT_HEADING
        }
    }

    /// Message for an empty view.
    pub fn empty_state_message(&self) -> &'static str {
        if self.query.is_active() {
            NO_MATCHES_MESSAGE
        } else {
            NO_COMPLAINTS_MESSAGE
        }
    }

    /// Whether the new-complaint panel is showing.
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Open the new-complaint panel. Only students submit complaints, so
    /// this returns `false` and does nothing for administrators.
    pub fn open_panel(&mut self) -> bool {
        if self.session.is_admin() {
            return false;
        }
        self.panel_open = true;
        true
    }

    /// Close the panel, keeping the draft.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Flip the panel state.
    pub fn toggle_panel(&mut self) {
        if self.panel_open {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    /// Current draft.
    pub fn draft(&self) -> &ComplaintDraft {
        &self.draft
    }

    /// Mutable access for input handlers.
    pub fn draft_mut(&mut self) -> &mut ComplaintDraft {
        &mut self.draft
    }

    /// Whether a create request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Inline error from the last failed action.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Dismiss the inline error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn record<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Ok(_) => self.error = None,
            Err(err) => self.error = Some(err.clone()),
        }
        result
    }
}

impl<A> ComplaintListController<A>
where
    A: PortalApi,
{
    /// Create the drafted complaint.
    ///
    /// On success the server's complaint is prepended, the draft is reset,
    /// and the panel closes. On failure the draft is left for a retry.
    /// An incomplete draft is rejected before any request is made.
    pub async fn submit(&mut self) -> Result<Complaint, Error> {
        let draft = match self.draft.validate() {
            Ok(draft) => draft,
            Err(err) => return self.record(Err(Error::invalid_request(err.to_string()))),
        };
        self.submitting = true;
        let result = self
            .api
            .create_complaint(self.session.token(), &draft)
            .await;
        self.submitting = false;
        if let Ok(created) = &result {
            debug!(complaint_id = %created.id(), "complaint created");
            self.complaints.insert(0, created.clone());
            self.draft = ComplaintDraft::default();
            self.panel_open = false;
        }
        self.record(result)
    }

    /// Move a complaint to `status`. Administrators only.
    ///
    /// The matching entry is replaced by id once the server confirms; on
    /// failure nothing local changes.
    pub async fn change_status(
        &mut self,
        id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, Error> {
        if !self.session.is_admin() {
            return self.record(Err(Error::forbidden(
                "Only administrators can update complaint status",
            )));
        }
        let result = self
            .api
            .update_status(self.session.token(), id, status)
            .await;
        if let Ok(updated) = &result {
            debug!(complaint_id = %id, status = %updated.status(), "complaint status updated");
            if let Some(slot) = self.complaints.iter_mut().find(|c| c.id() == id) {
                *slot = updated.clone();
            }
        }
        self.record(result)
    }

    /// Delete a complaint remotely, then drop it from the local list.
    pub async fn withdraw(&mut self, id: ComplaintId) -> Result<(), Error> {
        let result = self
            .api
            .delete_complaint(self.session.token(), id)
            .await;
        if result.is_ok() {
            debug!(complaint_id = %id, "complaint withdrawn");
            self.complaints.retain(|c| c.id() != id);
        }
        self.record(result)
    }

    /// Replace the full list with a fresh copy from the server.
    pub async fn reload(&mut self) -> Result<(), Error> {
        let result = self.api.list_complaints(self.session.token()).await;
        let outcome = result.map(|complaints| {
            self.complaints = complaints;
        });
        self.record(outcome)
    }
}
