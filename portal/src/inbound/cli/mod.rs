//! Command-line inbound adapter.
//!
//! Parses arguments with `clap`, drives the domain controllers through the
//! ports it is handed, and renders results as plain text or JSON. Adapter
//! selection happens in the binary so this module never names an outbound
//! type.

mod args;
pub mod render;
mod run;

pub use args::{Cli, Command, ComplaintCommand, LoginArgs, RegisterArgs};
pub use run::{CliContext, CliError, run};
