//! # Tasklane API Server Library
//!
//! HTTP surface for the Tasklane todo backend.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from environment variables
//! - `error`: Error type and HTTP response mapping
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
