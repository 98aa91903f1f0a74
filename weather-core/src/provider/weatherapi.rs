use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::{ClassifiedError, ErrorKind},
    model::WeatherRecord,
};

use super::WeatherProvider;

/// Client for the WeatherAPI.com `current.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }

    fn endpoint(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_current(&self, api_key: &str, city: &str) -> Result<WeatherRecord, ClassifiedError> {
        let endpoint = self.endpoint();
        // The key stays out of the log line.
        debug!(%endpoint, city, "requesting current weather");

        let res = self
            .http
            .get(&endpoint)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| ClassifiedError::new(ErrorKind::RequestFailed).wrap(e.without_url()))?;

        let status = res.status();
        match status {
            StatusCode::OK => {
                let body = res
                    .bytes()
                    .await
                    .map_err(|e| ClassifiedError::new(ErrorKind::ParseResponse).wrap(e.without_url()))?;
                parse_current(&body)
            }
            StatusCode::BAD_REQUEST => Err(ErrorKind::InvalidCity.into()),
            StatusCode::FORBIDDEN => {
                // Drain the body so the connection can be reused; its content is not surfaced.
                match res.bytes().await {
                    Ok(body) => {
                        warn!(status = status.as_u16(), body_len = body.len(), "upstream refused access")
                    }
                    Err(e) => {
                        warn!(status = status.as_u16(), "upstream refused access");
                        debug!(error = %e.without_url(), "failed to read forbidden response body");
                    }
                }
                Err(ErrorKind::ForbiddenAccess.into())
            }
            other => {
                warn!(status = other.as_u16(), "unexpected upstream status");
                Err(ErrorKind::UnexpectedStatus(other.as_u16()).into())
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, api_key: &str, city: &str) -> Result<WeatherRecord, ClassifiedError> {
        self.fetch_current(api_key, city).await
    }
}

/// Map a 200 body into a record.
///
/// Missing or mistyped containers (`location`, `current`, `condition`) are
/// errors; missing or mistyped leaves fall back to their default.
fn parse_current(body: &[u8]) -> Result<WeatherRecord, ClassifiedError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ClassifiedError::new(ErrorKind::ParseResponse).wrap(e))?;
    if !value.is_object() {
        return Err(ClassifiedError::new(ErrorKind::ParseResponse).wrap("body is not a JSON object"));
    }
    let parsed = WaResponse::deserialize(value)
        .map_err(|e| ClassifiedError::new(ErrorKind::ParseResponse).wrap(e))?;

    let location = parsed.location.ok_or(ErrorKind::LocationMissing)?;
    let current = parsed.current.ok_or(ErrorKind::CurrentMissing)?;
    let condition = current.condition.ok_or(ErrorKind::ConditionMissing)?;

    Ok(WeatherRecord {
        city: location.name,
        region: location.region,
        country: location.country,
        tz_id: location.tz_id,
        temperature: current.temp_c,
        feels_like: current.feelslike_c,
        condition_text: condition.text,
    })
}

/// Deserialize `T`, falling back to `T::default()` when the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserialize a nested object. Anything but a JSON object, arrays included, yields `None`.
fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(T::deserialize(value).ok())
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    #[serde(default, deserialize_with = "lenient")]
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    region: String,
    #[serde(default, deserialize_with = "lenient")]
    country: String,
    #[serde(default, deserialize_with = "lenient")]
    tz_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    #[serde(default, deserialize_with = "lenient")]
    temp_c: f64,
    #[serde(default, deserialize_with = "lenient")]
    feelslike_c: f64,
    #[serde(default, deserialize_with = "object")]
    condition: Option<WaCondition>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    #[serde(default, deserialize_with = "object")]
    location: Option<WaLocation>,
    #[serde(default, deserialize_with = "object")]
    current: Option<WaCurrent>,
}
