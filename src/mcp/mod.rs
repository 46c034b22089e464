//! Tool server module
//!
//! Implements tool listing, tool dispatch and the HTTP API exposing them.

pub mod server;
pub mod tools;
pub mod types;
