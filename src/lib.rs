//! Google Docs Tools Server Library
//!
//! An HTTP tool server that lets an automated agent create Google Docs.
//! Authenticates with OAuth 2.0 and forwards requests to the Google Docs API.

pub mod config;
pub mod error;
pub mod google;
pub mod mcp;

pub use config::Config;
pub use error::{DocsToolsError, Result};
