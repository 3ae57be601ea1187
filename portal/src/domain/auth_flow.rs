//! Login and registration form controller.
//!
//! Two flat modes, toggled rather than nested. A successful login persists
//! the session and routes to the dashboard; a successful registration flips
//! back to login mode with a confirmation notice.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{PortalApi, SessionStore, SessionStoreError};
use crate::domain::{Error, LoginCredentials, Registration, RegistrationInput};

/// Confirmation shown after a successful registration.
pub const REGISTRATION_NOTICE: &str = "Registration successful! Please login.";

/// Screen the caller should show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The login form.
    Login,
    /// The complaint dashboard.
    Dashboard,
}

/// Which form the controller is presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Email and password only.
    #[default]
    Login,
    /// Full student profile.
    Register,
}

/// Raw form values. Registration-only fields are ignored in login mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Roll number.
    pub roll_number: String,
    /// Password.
    pub password: String,
    /// Hostel name; blank when not chosen.
    pub hostel: String,
    /// Room number; blank when not given.
    pub room_number: String,
}

pub(crate) fn map_session_error(error: SessionStoreError) -> Error {
    Error::internal(error.to_string())
}

/// Controller owning the auth form state.
pub struct AuthController<A, S> {
    api: Arc<A>,
    sessions: Arc<S>,
    mode: AuthMode,
    form: AuthForm,
    error: Option<Error>,
    notice: Option<String>,
    submitting: bool,
}

impl<A, S> AuthController<A, S> {
    /// Start in login mode with an empty form and no messages.
    pub fn new(api: Arc<A>, sessions: Arc<S>) -> Self {
        Self {
            api,
            sessions,
            mode: AuthMode::default(),
            form: AuthForm::default(),
            error: None,
            notice: None,
            submitting: false,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Current form values.
    pub fn form(&self) -> &AuthForm {
        &self.form
    }

    /// Mutable access for input handlers.
    pub fn form_mut(&mut self) -> &mut AuthForm {
        &mut self.form
    }

    /// Inline error, if the last submission failed. Validation failures
    /// carry [`ErrorCode::InvalidRequest`](crate::domain::ErrorCode); API
    /// failures keep the code the server answered with.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Inline confirmation, if registration just succeeded.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether a submission is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Switch between login and registration, clearing both messages.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
        self.notice = None;
    }
}

impl<A, S> AuthController<A, S>
where
    A: PortalApi,
    S: SessionStore,
{
    /// Submit the form in the current mode.
    ///
    /// Returns the route to navigate to, or `None` to stay on the form.
    /// The exclusive borrow rules out a second submission while one is
    /// outstanding.
    pub async fn submit(&mut self) -> Option<Route> {
        self.submitting = true;
        self.error = None;
        self.notice = None;
        let route = match self.mode {
            AuthMode::Login => self.login().await,
            AuthMode::Register => self.register().await,
        };
        self.submitting = false;
        route
    }

    async fn login(&mut self) -> Option<Route> {
        let credentials =
            match LoginCredentials::try_from_parts(&self.form.email, &self.form.password) {
                Ok(credentials) => credentials,
                Err(err) => {
                    self.error = Some(Error::invalid_request(err.to_string()));
                    return None;
                }
            };
        let outcome = match self.api.login(&credentials).await {
            Ok(session) => self.sessions.save(&session).map_err(map_session_error),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => {
                debug!(email = credentials.email(), "login succeeded");
                Some(Route::Dashboard)
            }
            Err(err) => {
                debug!(email = credentials.email(), code = ?err.code(), "login failed");
                self.error = Some(err);
                None
            }
        }
    }

    async fn register(&mut self) -> Option<Route> {
        let registration = match Registration::try_from_input(RegistrationInput {
            name: &self.form.name,
            email: &self.form.email,
            roll_number: &self.form.roll_number,
            password: &self.form.password,
            hostel: &self.form.hostel,
            room_number: &self.form.room_number,
        }) {
            Ok(registration) => registration,
            Err(err) => {
                self.error = Some(Error::invalid_request(err.to_string()));
                return None;
            }
        };
        match self.api.register(&registration).await {
            Ok(user) => {
                debug!(user_id = %user.id(), "registration succeeded");
                self.mode = AuthMode::Login;
                self.form = AuthForm::default();
                self.notice = Some(REGISTRATION_NOTICE.to_owned());
                None
            }
            Err(err) => {
                debug!(code = ?err.code(), "registration failed");
                self.error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
