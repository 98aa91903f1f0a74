use std::fmt;

use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The fixed set of failures the service can report.
///
/// Each kind determines the client-facing message, the HTTP status and
/// whether the failure is worth logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("city parameter is missing")]
    CityMissing,
    #[error("city value too short")]
    CityTooShort,
    #[error("city value too long")]
    CityTooLong,
    #[error("API key not found")]
    ApiKeyMissing,
    #[error("request failed")]
    RequestFailed,
    #[error("failed to parse response")]
    ParseResponse,
    #[error("failed to retrieve location data")]
    LocationMissing,
    #[error("failed to retrieve current weather data")]
    CurrentMissing,
    #[error("failed to retrieve weather condition data")]
    ConditionMissing,
    #[error("invalid city name")]
    InvalidCity,
    #[error("forbidden access")]
    ForbiddenAccess,
    /// Upstream answered with a status we have no mapping for. Upstream
    /// 4xx/5xx codes are passed through, anything else becomes 502.
    #[error("unexpected status code")]
    UnexpectedStatus(u16),
}

impl ErrorKind {
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::CityMissing
            | ErrorKind::CityTooShort
            | ErrorKind::CityTooLong
            | ErrorKind::InvalidCity => 400,
            ErrorKind::ForbiddenAccess => 403,
            ErrorKind::ApiKeyMissing
            | ErrorKind::RequestFailed
            | ErrorKind::ParseResponse
            | ErrorKind::LocationMissing
            | ErrorKind::CurrentMissing
            | ErrorKind::ConditionMissing => 500,
            // Below 400 the response could not carry an error body.
            ErrorKind::UnexpectedStatus(code) if (400..=599).contains(code) => *code,
            ErrorKind::UnexpectedStatus(_) => 502,
        }
    }

    /// Client input problems are expected and stay out of the logs.
    pub fn is_loggable(&self) -> bool {
        !matches!(
            self,
            ErrorKind::CityMissing
                | ErrorKind::CityTooShort
                | ErrorKind::CityTooLong
                | ErrorKind::InvalidCity
        )
    }
}

/// An [`ErrorKind`] decorated with an optional underlying cause and an
/// optional JSON payload for diagnostics.
#[derive(Error)]
#[error("{kind}{}", render_cause(.cause))]
pub struct ClassifiedError {
    kind: ErrorKind,
    #[source]
    cause: Option<Cause>,
    data: Option<serde_json::Value>,
}

fn render_cause(cause: &Option<Cause>) -> String {
    cause.as_ref().map(|c| format!(": {c}")).unwrap_or_default()
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, cause: None, data: None }
    }

    /// Attach the underlying error. Replaces any previous cause.
    pub fn wrap<E>(mut self, cause: E) -> Self
    where
        E: Into<Cause>,
    {
        self.cause = Some(cause.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<serde_json::Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn clear_data(mut self) -> Self {
        self.data = None;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> u16 {
        self.kind.status()
    }

    pub fn is_loggable(&self) -> bool {
        self.kind.is_loggable()
    }

    /// The kind's message without the cause; safe to show to clients.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }
}

impl From<ErrorKind> for ClassifiedError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Debug for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifiedError")
            .field("kind", &self.kind)
            .field("status", &self.status())
            .field("loggable", &self.is_loggable())
            .field("cause", &self.cause)
            .field("data", &self.data)
            .finish()
    }
}
