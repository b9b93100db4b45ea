// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod export;
pub mod grid;
pub mod places_client;
pub mod scraper;
pub mod translator;

pub use export::*;
pub use grid::*;
pub use places_client::*;
pub use scraper::*;
pub use translator::*;
