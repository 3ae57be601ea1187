//! Outbound adapters implementing the domain ports.
//!
//! - **http**: `reqwest` client for the complaint backend (`PortalApi`).
//! - **session**: `cap-std` JSON file store (`SessionStore`).
//!
//! Adapters translate between wire or file formats and domain types. They
//! contain no workflow logic.

pub mod http;
pub mod session;
