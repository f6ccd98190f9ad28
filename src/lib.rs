pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod i18n;
pub mod pages;
pub mod utils;

pub use adapters::{GooglePlaces, SupabaseAuth, SupabaseClient, SupabaseVenueStore};
pub use config::AppConfig;
pub use core::{imagery::LocationImages, session::Session, venues::VenueBook};
pub use utils::error::{PlannerError, Result};

#[cfg(feature = "cli")]
pub use config::cli::Cli;
