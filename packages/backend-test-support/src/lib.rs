//! Backend test support utilities
//!
//! Helpers shared by the backend's integration tests: unified logging
//! initialization and assertions over the JSON response envelope.

pub mod envelope;
pub mod logging;
