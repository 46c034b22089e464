//! Google API module
//!
//! Contains authentication, wire types, and the client for the Google Docs API.

pub mod auth;
pub mod docs;
pub mod types;
