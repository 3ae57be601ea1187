//! Inbound adapters translating user input into domain workflow calls while
//! keeping framework details at the edge.
//!
//! The command-line surface lives under [`cli`].

pub mod cli;
