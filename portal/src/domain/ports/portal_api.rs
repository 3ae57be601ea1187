//! Driven port for the remote complaint-management backend.
//!
//! Every operation is single-shot and never retried. Failures arrive as
//! [`Error`] values whose [`ErrorCode`](crate::domain::ErrorCode) tells the
//! caller whether the credential is stale (`Unauthorized`), the input was
//! rejected (`InvalidRequest`), the role was insufficient (`Forbidden`), the
//! id was unknown (`NotFound`), or the transport failed (`Fetch`).

use async_trait::async_trait;

use crate::domain::{
    AccessToken, Complaint, ComplaintId, ComplaintStatus, Error, LoginCredentials, NewComplaint,
    Registration, Session, User,
};

/// Port for the authenticated complaint API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Exchange credentials for a session. Every failure is `Unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error>;

    /// Create a student account.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;

    /// Profile of the token's owner.
    async fn fetch_profile(&self, token: &AccessToken) -> Result<User, Error>;

    /// Complaints visible to the caller; the server decides the scope.
    async fn list_complaints(&self, token: &AccessToken) -> Result<Vec<Complaint>, Error>;

    /// Submit a new complaint; the server assigns id, status, and timestamp.
    async fn create_complaint(
        &self,
        token: &AccessToken,
        complaint: &NewComplaint,
    ) -> Result<Complaint, Error>;

    /// Transition a complaint's status. Administrators only.
    async fn update_status(
        &self,
        token: &AccessToken,
        id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, Error>;

    /// Fetch one complaint by id.
    async fn fetch_complaint(&self, token: &AccessToken, id: ComplaintId)
    -> Result<Complaint, Error>;

    /// Delete a complaint. Allowed for administrators and the owner.
    async fn delete_complaint(&self, token: &AccessToken, id: ComplaintId) -> Result<(), Error>;

    /// Every registered user. Administrators only.
    async fn list_users(&self, token: &AccessToken) -> Result<Vec<User>, Error>;
}
