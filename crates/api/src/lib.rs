//! Library half of the comics API server.
//!
//! The binary in `main.rs` only wires things together; config, state,
//! error mapping, routes, and auth all live here as public modules so
//! the integration tests can assemble the same app in-process.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
