//! Alifi admin console library.
//!
//! The headless core of the Alifi pet-care admin console: everything the
//! dashboard does except rendering. A UI layer drives this crate by calling
//! into its services and presenting what they return.
//!
//! # Architecture
//!
//! The backend (authentication, document database, blob storage) is an
//! external collaborator reached through the capability traits in
//! [`gateway`]. The console never talks to a wire protocol directly; an
//! in-memory gateway implementation backs the test suite and offline use.
//!
//! The one piece with a real ordering concern is [`provisioning`]: creating
//! a veterinarian account makes the *new* account the active identity as a
//! provider side effect, so the flow must evict it and restore the admin's
//! own session without the session controller routing on the intermediate
//! identity changes.
//!
//! # Security
//!
//! The console caches the operator's own credentials at login to support
//! account provisioning, and writes admin role claims directly to the
//! document store. Both are inherited trust-boundary gaps; see DESIGN.md.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod messaging;
pub mod models;
pub mod provisioning;
pub mod resources;
pub mod session;
pub mod stats;
pub mod telemetry;
