//! Domain primitives, controllers, and ports.
//!
//! Purpose: model complaints, users, and sessions as strongly typed values,
//! and drive the dashboard workflows through the [`ports`] boundary so no
//! transport or storage detail leaks in.
//!
//! Public surface:
//! - Error (alias to `error::Error`) and ErrorCode: uniform failure contract.
//! - Complaint, Category, ComplaintStatus, NewComplaint: the complaint record.
//! - User, Role, Hostel, Registration: account data.
//! - LoginCredentials, AccessToken, Session: authentication values.
//! - derive_view, ComplaintQuery, StatusFilter: the pure filtered view.
//! - AuthController, ComplaintListController, DashboardBootstrap: workflows.

pub mod auth;
mod auth_flow;
pub mod complaint;
mod complaint_list;
mod dashboard;
pub mod error;
pub mod filter;
pub mod ports;
pub mod user;

pub use self::auth::{AccessToken, LoginCredentials, LoginValidationError, Session};
pub use self::auth_flow::{AuthController, AuthForm, AuthMode, REGISTRATION_NOTICE, Route};
pub use self::complaint::{
    Category, Complaint, ComplaintBuilder, ComplaintId, ComplaintStatus,
    ComplaintValidationError, NewComplaint,
};
pub use self::complaint_list::{
    ADMIN_HEADING, ComplaintDraft, ComplaintListController, NO_COMPLAINTS_MESSAGE,
    NO_MATCHES_MESSAGE, STUDENT_HEADING,
};
pub use self::dashboard::{
    Access, DEFAULT_EXPIRY_DELAY, Dashboard, DashboardBootstrap, DashboardEntry, Eviction,
    ExpiryPolicy,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::filter::{ComplaintQuery, StatusFilter, derive_view};
pub use self::user::{
    Hostel, Registration, RegistrationInput, Role, User, UserBuilder, UserId,
    UserValidationError,
};

/// Result alias used across the domain.
///
/// # Examples
/// ```
/// use portal::domain::{DomainResult, Error};
///
/// fn guard(admin: bool) -> DomainResult<()> {
///     if admin { Ok(()) } else { Err(Error::forbidden("Access denied")) }
/// }
/// assert!(guard(false).is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
