use serde::{Deserialize, Serialize};

use crate::error::{ClassifiedError, ErrorKind};

pub const MIN_CITY_LEN: usize = 2;
pub const MAX_CITY_LEN: usize = 30;

/// A city name that passed validation and may be sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
}

impl WeatherRequest {
    /// Validate the raw `city` query value. Length is counted in UTF-8 bytes.
    pub fn parse(city: Option<&str>) -> Result<Self, ClassifiedError> {
        let city = match city {
            Some(c) if !c.is_empty() => c,
            _ => return Err(ErrorKind::CityMissing.into()),
        };

        match city.len() {
            n if n < MIN_CITY_LEN => Err(ErrorKind::CityTooShort.into()),
            n if n > MAX_CITY_LEN => Err(ErrorKind::CityTooLong.into()),
            _ => Ok(Self { city: city.to_owned() }),
        }
    }
}

/// Normalized weather served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub region: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz_id: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_text: Option<String>,
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl From<&ClassifiedError> for ErrorBody {
    fn from(err: &ClassifiedError) -> Self {
        Self { code: err.status(), message: err.message() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_city_is_rejected() {
        assert_eq!(WeatherRequest::parse(None).unwrap_err().kind(), ErrorKind::CityMissing);
        assert_eq!(WeatherRequest::parse(Some("")).unwrap_err().kind(), ErrorKind::CityMissing);
    }

    #[test]
    fn city_length_bounds() {
        assert_eq!(WeatherRequest::parse(Some("a")).unwrap_err().kind(), ErrorKind::CityTooShort);
        assert!(WeatherRequest::parse(Some("ab")).is_ok());
        assert!(WeatherRequest::parse(Some("a".repeat(30).as_str())).is_ok());
        assert_eq!(
            WeatherRequest::parse(Some("a".repeat(31).as_str())).unwrap_err().kind(),
            ErrorKind::CityTooLong
        );
    }

    #[test]
    fn city_length_counts_bytes() {
        // "ü" is two bytes in UTF-8.
        let city = "ü".repeat(15);
        assert_eq!(WeatherRequest::parse(Some(city.as_str())).unwrap().city, city);

        let city = "ü".repeat(16);
        assert_eq!(
            WeatherRequest::parse(Some(city.as_str())).unwrap_err().kind(),
            ErrorKind::CityTooLong
        );
        assert!(WeatherRequest::parse(Some("ü")).is_ok());
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = WeatherRecord {
            city: "Istanbul".into(),
            region: "Istanbul".into(),
            country: "Turkey".into(),
            tz_id: Some("Europe/Istanbul".into()),
            temperature: 19.0,
            feels_like: 17.5,
            condition_text: Some("Sunny".into()),
        };

        let json = serde_json::to_string(&record).unwrap();
        let decoded: WeatherRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let record = WeatherRecord {
            city: "Oslo".into(),
            region: String::new(),
            country: "Norway".into(),
            tz_id: None,
            temperature: -3.0,
            feels_like: -8.5,
            condition_text: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("tz_id").is_none());
        assert!(value.get("condition_text").is_none());
        assert_eq!(value["feels_like"], -8.5);
    }

    #[test]
    fn error_body_hides_cause() {
        let err = ClassifiedError::new(ErrorKind::ParseResponse).wrap("expected value at line 1");
        let body = ErrorBody::from(&err);

        assert_eq!(body, ErrorBody { code: 500, message: "failed to parse response".into() });
    }
}
