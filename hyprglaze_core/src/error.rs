//! Error handling for the hyprglaze services

use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::fmt;

/// Why the device location could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location permission denied, allow location access")]
    PermissionDenied,

    #[error("Unable to determine the current position")]
    PositionUnavailable,

    #[error("Timed out while resolving the location, check the network connection")]
    Timeout,
}

/// Service error types
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Geolocation error: {source}")]
    Geolocation {
        #[from]
        source: GeolocationError,
    },

    #[error("Weather API error: {message}")]
    WeatherApi { message: String },

    #[error("WebSocket connection error: {message}")]
    WebSocket { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("{message}")]
    Unknown { message: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn weather_api<S: Into<String>>(message: S) -> Self {
        Self::WeatherApi {
            message: message.into(),
        }
    }

    pub fn websocket<S: Into<String>>(message: S) -> Self {
        Self::WebSocket {
            message: message.into(),
        }
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn unknown<S: Into<String>>(message: S) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Stable error code used in reports and logs
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network { .. } => ErrorCode::NetworkError,
            Self::Geolocation { source } => match source {
                GeolocationError::PermissionDenied => ErrorCode::GeolocationDenied,
                GeolocationError::PositionUnavailable => ErrorCode::GeolocationUnavailable,
                GeolocationError::Timeout => ErrorCode::GeolocationTimeout,
            },
            Self::WeatherApi { .. } => ErrorCode::WeatherApiError,
            Self::WebSocket { .. } => ErrorCode::WebsocketConnectionError,
            Self::Storage { .. } => ErrorCode::StorageError,
            Self::Config { .. } => ErrorCode::ConfigError,
            Self::Serialization { .. } => ErrorCode::ValidationError,
            Self::Unknown { .. } => ErrorCode::UnknownError,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Network { .. } | Self::Config { .. } => Severity::High,
            Self::WebSocket { .. } => Severity::Low,
            _ => Severity::Medium,
        }
    }

    /// Normalize into the common report shape
    pub fn report(&self, context: Option<&str>) -> ErrorReport {
        ErrorReport {
            message: self.to_string(),
            code: self.code(),
            severity: self.severity(),
            timestamp: Local::now(),
            context: context.map(str::to_string),
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(format!("HTTP request failed: {}", err))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CoreError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::websocket(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NetworkError,
    GeolocationDenied,
    GeolocationUnavailable,
    GeolocationTimeout,
    WeatherApiError,
    WebsocketConnectionError,
    StorageError,
    ConfigError,
    ValidationError,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::GeolocationDenied => "GEOLOCATION_DENIED",
            Self::GeolocationUnavailable => "GEOLOCATION_UNAVAILABLE",
            Self::GeolocationTimeout => "GEOLOCATION_TIMEOUT",
            Self::WeatherApiError => "WEATHER_API_ERROR",
            Self::WebsocketConnectionError => "WEBSOCKET_CONNECTION_ERROR",
            Self::StorageError => "STORAGE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized error shape shared by logging and the widgets
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub code: ErrorCode,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
    pub context: Option<String>,
}

impl ErrorReport {
    /// Build a report for an error that did not come from this crate
    pub fn unknown<S: Into<String>>(message: S, context: Option<&str>) -> Self {
        CoreError::unknown(message).report(context)
    }

    /// Log at a level matching the severity
    pub fn log(&self) {
        let context = self.context.as_deref().unwrap_or("unknown");
        match self.severity {
            Severity::High => error!("[{}] {} (context: {})", self.code, self.message, context),
            Severity::Medium => warn!("[{}] {} (context: {})", self.code, self.message, context),
            Severity::Low => info!("[{}] {} (context: {})", self.code, self.message, context),
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
