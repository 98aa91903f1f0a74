use crate::{
    Config, WeatherRecord, error::ClassifiedError, provider::weatherapi::WeatherApiProvider,
};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city` using `api_key`.
    async fn fetch(&self, api_key: &str, city: &str) -> Result<WeatherRecord, ClassifiedError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.upstream_timeout() {
        builder = builder.timeout(timeout);
    }
    let http = builder.build().context("Failed to build HTTP client")?;

    Ok(Box::new(WeatherApiProvider::with_client(config.base_url.clone(), http)))
}
