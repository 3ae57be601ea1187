//! HTTP adapter for the complaint backend.

mod dto;
mod http_portal;

pub use http_portal::HttpPortalApi;
