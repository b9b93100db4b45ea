// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Expose the modules to both binaries and the integration tests

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use errors::LeadError;
