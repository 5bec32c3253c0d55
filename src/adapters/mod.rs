// Adapters: concrete implementations of the domain ports (storage, ephemeris API).

pub mod catalog;
pub mod circuit_breaker;
pub mod ephemeris;

pub use catalog::LocalStorage;
pub use ephemeris::{AstrologizeClient, EphemerisSettings};
