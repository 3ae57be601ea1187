//! Dashboard entry: session bootstrap, expiry handling, and route guards.
//!
//! Entering the dashboard reads the stored session, then fetches the profile
//! and complaint list concurrently. Both requests always run to completion.
//! A failure hands back an [`Eviction`] so the caller can show the error
//! before the session is cleared under the [`ExpiryPolicy`] delay.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::auth_flow::{Route, map_session_error};
use crate::domain::ports::{PortalApi, SessionStore};
use crate::domain::{ComplaintListController, Error, Session, User};

/// Default pause before evicting a session after a failed bootstrap.
pub const DEFAULT_EXPIRY_DELAY: Duration = Duration::from_secs(3);

/// How a failed bootstrap treats the stored session.
///
/// Authentication failures always evict. Other failures evict only when
/// `evict_on_transient` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    delay: Duration,
    evict_on_transient: bool,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_EXPIRY_DELAY,
            evict_on_transient: true,
        }
    }
}

impl ExpiryPolicy {
    /// Build a policy. A zero `delay` evicts immediately.
    pub const fn new(delay: Duration, evict_on_transient: bool) -> Self {
        Self {
            delay,
            evict_on_transient,
        }
    }

    /// Pause before eviction.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether non-authentication failures also evict.
    pub const fn evict_on_transient(&self) -> bool {
        self.evict_on_transient
    }

    /// Whether `error` should end the session.
    pub fn should_evict(&self, error: &Error) -> bool {
        error.is_auth_failure() || self.evict_on_transient
    }
}

/// Loaded dashboard state.
pub struct Dashboard<A> {
    profile: User,
    complaints: ComplaintListController<A>,
}

impl<A> Dashboard<A> {
    /// Profile of the logged-in user.
    pub fn profile(&self) -> &User {
        &self.profile
    }

    /// Complaint list controller.
    pub fn complaints(&self) -> &ComplaintListController<A> {
        &self.complaints
    }

    /// Mutable complaint list controller.
    pub fn complaints_mut(&mut self) -> &mut ComplaintListController<A> {
        &mut self.complaints
    }

    /// Split into parts.
    pub fn into_parts(self) -> (User, ComplaintListController<A>) {
        (self.profile, self.complaints)
    }
}

/// Session eviction scheduled by a failed bootstrap.
///
/// The session is still stored until [`Eviction::complete`] is awaited,
/// which waits out the policy delay and then clears it once.
#[must_use = "the session is only cleared once the eviction is awaited"]
pub struct Eviction<S> {
    sessions: Arc<S>,
    delay: Duration,
}

impl<S> Eviction<S> {
    /// Time left before the session is cleared.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<S: SessionStore> Eviction<S> {
    /// Wait for the delay, then clear the stored session.
    pub async fn complete(self) -> Result<(), Error> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.sessions.clear().map_err(map_session_error)?;
        debug!("expired session cleared");
        Ok(())
    }
}

/// Outcome of entering the dashboard.
pub enum DashboardEntry<A, S> {
    /// No stored session; nothing was fetched.
    RedirectToLogin,
    /// Profile and complaints loaded.
    Ready(Dashboard<A>),
    /// A fetch failed and the session must go. Show `message` straight
    /// away, then await `eviction` and route to login.
    Expiring {
        /// Error text to display.
        message: String,
        /// Pending clear of the stored session.
        eviction: Eviction<S>,
    },
    /// A transient failure left the session in place.
    Unavailable {
        /// Error text to display.
        message: String,
    },
}

impl<A, S> DashboardEntry<A, S> {
    /// Route to follow once any message has been shown.
    pub fn route(&self) -> Route {
        match self {
            Self::Ready(_) | Self::Unavailable { .. } => Route::Dashboard,
            Self::RedirectToLogin | Self::Expiring { .. } => Route::Login,
        }
    }
}

/// Result of a role guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Session satisfies the guard.
    Granted(Session),
    /// Caller must navigate elsewhere.
    Redirect(Route),
}

/// Dashboard entry point wired to its ports.
pub struct DashboardBootstrap<A, S> {
    api: Arc<A>,
    sessions: Arc<S>,
    policy: ExpiryPolicy,
}

impl<A, S> DashboardBootstrap<A, S> {
    /// Create a bootstrap with the given ports and policy.
    pub fn new(api: Arc<A>, sessions: Arc<S>, policy: ExpiryPolicy) -> Self {
        Self {
            api,
            sessions,
            policy,
        }
    }

    /// Active expiry policy.
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }
}

impl<A, S> DashboardBootstrap<A, S>
where
    A: PortalApi,
    S: SessionStore,
{
    /// Load the dashboard for the stored session.
    ///
    /// A failed fetch returns as soon as both requests settle; any eviction
    /// is handed back in [`DashboardEntry::Expiring`] rather than waited on
    /// here. Returns `Err` only when the session store itself fails.
    pub async fn enter(&self) -> Result<DashboardEntry<A, S>, Error> {
        let Some(session) = self.sessions.load().map_err(map_session_error)? else {
            debug!("no stored session; redirecting to login");
            return Ok(DashboardEntry::RedirectToLogin);
        };

        let (profile, complaints) = tokio::join!(
            self.api.fetch_profile(session.token()),
            self.api.list_complaints(session.token()),
        );

        match (profile, complaints) {
            (Ok(profile), Ok(complaints)) => {
                debug!(user_id = %profile.id(), count = complaints.len(), "dashboard loaded");
                let list = ComplaintListController::new(Arc::clone(&self.api), session, complaints);
                Ok(DashboardEntry::Ready(Dashboard {
                    profile,
                    complaints: list,
                }))
            }
            (Err(err), _) | (_, Err(err)) => Ok(self.fail(&err)),
        }
    }

    fn fail(&self, err: &Error) -> DashboardEntry<A, S> {
        let message = err.message().to_owned();
        if !self.policy.should_evict(err) {
            warn!(code = ?err.code(), "dashboard fetch failed; keeping session");
            return DashboardEntry::Unavailable { message };
        }
        warn!(
            code = ?err.code(),
            delay_ms = u64::try_from(self.policy.delay.as_millis()).unwrap_or(u64::MAX),
            "dashboard fetch failed; scheduling session eviction"
        );
        DashboardEntry::Expiring {
            message,
            eviction: Eviction {
                sessions: Arc::clone(&self.sessions),
                delay: self.policy.delay,
            },
        }
    }

    /// Clear the stored session.
    pub fn logout(&self) -> Result<Route, Error> {
        self.sessions.clear().map_err(map_session_error)?;
        debug!("session cleared");
        Ok(Route::Login)
    }

    /// Stored session, if any; otherwise a redirect to login.
    pub fn require_session(&self) -> Result<Access, Error> {
        Ok(match self.sessions.load().map_err(map_session_error)? {
            Some(session) => Access::Granted(session),
            None => Access::Redirect(Route::Login),
        })
    }

    /// Admin guard: no session routes to login, a student session routes
    /// back to the dashboard.
    pub fn require_admin(&self) -> Result<Access, Error> {
        Ok(match self.require_session()? {
            Access::Granted(session) if !session.is_admin() => Access::Redirect(Route::Dashboard),
            access => access,
        })
    }
}
