//! Scout Common - Shared configuration, errors and logging for Market Scout.
//!
//! This crate provides:
//! - Configuration types and loading (`~/.scout/config.json` + `SCOUT_*` env)
//! - The shared error type
//! - Logging setup with noise filtering

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, ObservabilityConfig, OutputSettings, ScreenerSettings, UniverseEntry};
pub use error::{Error, Result};

