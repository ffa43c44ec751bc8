//! Core library for the `weather-lookup` CLI.
//!
//! This crate defines:
//! - Configuration resolved once at startup (file + environment)
//! - The weather fetcher, with live and demo providers
//! - Icon resolution and shared domain models
//! - The search session that keeps only the latest result
//!
//! It is used by `weather-lookup`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod icon;
pub mod model;
pub mod provider;
pub mod search;

pub use config::{Config, DemoReason, FetchMode};
pub use error::WeatherError;
pub use icon::{Glyph, resolve_icon};
pub use model::{WeatherQuery, WeatherRecord};
pub use provider::{WeatherFetcher, WeatherProvider, provider_from_config};
pub use search::{SearchOutcome, SearchSession, SearchState, View};
