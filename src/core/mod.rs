pub mod chakra;
pub mod collective;
pub mod cuisine;
pub mod elements;
pub mod engine;
pub mod ephemeris;
pub mod lunar;
pub mod menu;
pub mod planets;
pub mod quantities;
pub mod recommend;
pub mod report;
pub mod scoring;
pub mod seasonal;
pub mod thermodynamics;
pub mod transit;
pub mod wellness;
pub mod zodiac;

pub use crate::domain::model::{KitchenInput, PlanetarySnapshot};
pub use crate::domain::ports::{ConfigProvider, EphemerisSource, Pipeline, Storage};
pub use crate::utils::error::Result;
