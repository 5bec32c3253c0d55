pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::KitchenConfig;

pub use adapters::{AstrologizeClient, EphemerisSettings, LocalStorage};
pub use app::pipelines::RecommendationPipeline;
pub use crate::core::{engine::KitchenEngine, ephemeris::LocalEphemeris, report::KitchenReport};
pub use utils::error::{KitchenError, Result};
