//! Hostel complaint portal client.
//!
//! Students submit maintenance complaints; administrators triage them and
//! change their status. The crate talks to an external REST backend and
//! keeps the authenticated session in a local file.
//!
//! Layout follows a ports-and-adapters split:
//! - [`domain`]: complaint and user model, the filtered view, workflow
//!   controllers, and the `PortalApi` / `SessionStore` ports.
//! - [`outbound`]: `reqwest` backend adapter and `cap-std` session file.
//! - [`inbound`]: `clap` command surface and text rendering.
//! - [`config`]: `ortho_config` settings.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::PortalSettings;
