//! # homeserver-domain
//!
//! Pure domain model for the homeserver control client.
//!
//! ## Responsibilities
//! - Foundational types: opaque backend identifiers, error conventions, timestamps
//! - Define the **session** types (SSH command sessions, credentials)
//! - Define **installation jobs** and the polling state machine that tracks them
//! - Define **liveness** bookkeeping (last success, consecutive failures, online flag)
//! - Define the **terminal** model (command history, output lines)
//! - Define the value types the backend speaks (stats, services, DNS, game servers, …)
//! - Contain all input validation and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod dns;
pub mod files;
pub mod gameserver;
pub mod installation;
pub mod liveness;
pub mod notification;
pub mod power;
pub mod service;
pub mod session;
pub mod stats;
pub mod terminal;
pub mod webspace;
