//! Core library for the weather proxy service.
//!
//! This crate defines:
//! - Classified errors carrying an HTTP status and a loggable flag
//! - Configuration loading
//! - The weather provider abstraction and the WeatherAPI.com client
//! - Shared domain models (validated requests, records, error bodies)
//!
//! It is used by `weather-server`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::{ClassifiedError, ErrorKind};
pub use model::{ErrorBody, WeatherRecord, WeatherRequest};
pub use provider::{WeatherProvider, provider_from_config};
