//! Environment-driven configuration, read once at startup.

pub mod bootstrap_admin;
pub mod db;
pub mod server;
