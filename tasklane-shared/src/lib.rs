//! # Tasklane Shared Library
//!
//! Entities, persistence, and authentication for the Tasklane todo backend.
//! The HTTP server in `tasklane-api` is a thin layer over this crate.
//!
//! ## Module Organization
//!
//! - `models`: Users, todos, and their constraints
//! - `services`: Todo and user operations over a caller-owned transaction
//! - `auth`: Password hashing, tokens, middleware, and ownership checks
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;

/// Current version of the Tasklane shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
