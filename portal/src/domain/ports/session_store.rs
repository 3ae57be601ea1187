//! Driven port for persisting the authenticated session between runs.
//!
//! The store holds at most one [`Session`]. Controllers receive it as an
//! explicit dependency instead of reaching for ambient global state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::domain::Session;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading or writing the stored session.
    pub enum SessionStoreError {
        /// Session storage could not be read.
        Read { message: String } => "session read failed: {message}",
        /// Session storage could not be written or removed.
        Write { message: String } => "session write failed: {message}",
        /// Session could not be encoded for storage.
        Encode { message: String } => "session encode failed: {message}",
    }
}

/// Port for loading, saving, and clearing the current session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Return the stored session, or `None` when nobody is logged in.
    ///
    /// Unreadable or malformed contents count as no session.
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// In-memory store for tests and behaviour scenarios.
///
/// Counts [`SessionStore::clear`] calls so callers can assert eviction
/// happened exactly once.
#[derive(Debug, Default)]
pub struct FixtureSessionStore {
    session: Mutex<Option<Session>>,
    clears: AtomicUsize,
}

impl FixtureSessionStore {
    /// Store pre-populated with `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            clears: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the stored session.
    pub fn current(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times the store has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for FixtureSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.current())
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
