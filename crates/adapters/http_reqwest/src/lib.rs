//! # homeserver-adapter-http-reqwest
//!
//! HTTP adapter built on [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement every API port of `homeserver-app` against the REST backend
//!   (`system/stats`, `gameserver/create`, `ssh/execute`, `filemanager/*`, ...)
//! - Decode the backend envelope: every JSON body carries `success` plus an
//!   optional `error` / `message`, the payload sits next to them
//! - Convert transport failures (`reqwest::Error`) into
//!   [`ApiError`](homeserver_domain::error::ApiError) at the port boundary
//!
//! ## Dependency rule
//! Depends on `homeserver-app` (for port traits) and `homeserver-domain`
//! (for the value types it decodes into). Never leaks reqwest types past
//! the adapter.

pub mod api;
pub mod client;
pub mod envelope;
pub mod error;

#[cfg(test)]
pub(crate) mod test_backend;

pub use client::{HttpClient, HttpConfig};
pub use error::HttpClientError;
