use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::Method,
};
use serde::Deserialize;
use weather_core::{ErrorKind, WeatherRecord, WeatherRequest};

use crate::{error::ApiError, server::AppState};

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// `GET /weather?city=<name>`
///
/// Checks run in order: method, city, API key. Only then is the provider called.
pub async fn weather(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherRecord>, ApiError> {
    if method != Method::GET {
        return Err(ErrorKind::MethodNotAllowed.into());
    }

    // An undecodable query string is treated like a missing city.
    let city = query.ok().and_then(|Query(q)| q.city);
    let request = WeatherRequest::parse(city.as_deref())?;

    let api_key = state.api_key.as_deref().ok_or(ErrorKind::ApiKeyMissing)?;

    let record = state.provider.fetch(api_key, &request.city).await?;
    Ok(Json(record))
}
