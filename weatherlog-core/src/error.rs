//! Error taxonomy shared by the fetcher, store and exporter.
//!
//! Every variant renders as a short message that a front-end can show
//! without further interpretation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Bad Request: Please check your input")]
    BadRequest,

    #[error("Unauthorized: Invalid API key")]
    Unauthorized,

    #[error("Forbidden: Access denied")]
    Forbidden,

    #[error("Not Found: City not found")]
    NotFound,

    #[error("Internal Server Error: Please try again later")]
    ServerError,

    #[error("Bad Gateway: Invalid response from server")]
    BadGateway,

    #[error("Service Unavailable: Server is down")]
    ServiceUnavailable,

    #[error("Gateway Timeout: No response from server")]
    GatewayTimeout,

    /// Any status the table above does not name.
    #[error("HTTP error {status}: {detail}")]
    HttpError { status: u16, detail: String },

    #[error("Connection Error: Check your internet connection")]
    Network,

    #[error("Timeout Error: The request timed out, try again later")]
    Timeout,

    #[error("Too many redirects: Check the URL")]
    TooManyRedirects,

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Database Error: {0}")]
    Store(String),

    #[error("Export Error: {0}")]
    Export(String),
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

impl WeatherError {
    /// Map a provider status code to its error kind.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::ServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => Self::HttpError { status, detail: detail.into() },
        }
    }

    /// Stable name of the kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::BadGateway => "bad_gateway",
            Self::ServiceUnavailable => "service_unavailable",
            Self::GatewayTimeout => "gateway_timeout",
            Self::HttpError { .. } => "http_error",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::TooManyRedirects => "too_many_redirects",
            Self::RequestError(_) => "request_error",
            Self::Store(_) => "store_error",
            Self::Export(_) => "export_error",
        }
    }

    /// True for failures reported by the provider rather than the transport.
    pub fn is_provider_status(&self) -> bool {
        matches!(
            self,
            Self::BadRequest
                | Self::Unauthorized
                | Self::Forbidden
                | Self::NotFound
                | Self::ServerError
                | Self::BadGateway
                | Self::ServiceUnavailable
                | Self::GatewayTimeout
                | Self::HttpError { .. }
        )
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();
        // Order matters: a connect timeout reports both is_timeout and is_connect.
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_connect() {
            Self::Network
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::RequestError(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for WeatherError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<csv::Error> for WeatherError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}
