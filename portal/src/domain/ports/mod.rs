//! Driven ports for the complaint backend and session persistence.

mod macros;
pub(crate) use macros::define_port_error;

mod fixture_portal;
mod portal_api;
mod session_store;

pub use fixture_portal::{FixtureOperation, FixturePortalApi};
#[cfg(test)]
pub use portal_api::MockPortalApi;
pub use portal_api::PortalApi;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{FixtureSessionStore, SessionStore, SessionStoreError};
