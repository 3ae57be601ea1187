//! Session persistence adapters.

mod atomic_io;
mod file_store;

pub use file_store::FileSessionStore;
