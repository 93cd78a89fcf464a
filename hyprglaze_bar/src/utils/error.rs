//! Error handling for the hyprglaze_bar application

use hyprglaze_core::{CoreError, ErrorReport};

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input error: {message}")]
    Input { message: String },

    #[error("UI error: {message}")]
    Ui { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn ui<S: Into<String>>(message: S) -> Self {
        Self::Ui {
            message: message.into(),
        }
    }

    /// Normalize into the shared report shape
    pub fn report(&self, context: &str) -> ErrorReport {
        match self {
            Self::Core(e) => e.report(Some(context)),
            Self::Config { message } => CoreError::config(message.clone()).report(Some(context)),
            other => ErrorReport::unknown(other.to_string(), Some(context)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyprglaze_core::{ErrorCode, Severity};

    #[test]
    fn core_errors_keep_their_code() {
        let err = AppError::from(CoreError::weather_api("HTTP 503"));
        let report = err.report("weather");
        assert_eq!(report.code, ErrorCode::WeatherApiError);
        assert_eq!(report.context.as_deref(), Some("weather"));
    }

    #[test]
    fn local_errors_become_unknown() {
        let report = AppError::ui("widget panicked").report("clock");
        assert_eq!(report.code, ErrorCode::UnknownError);
        assert_eq!(report.severity, Severity::Medium);
        assert!(report.message.contains("widget panicked"));
    }
}
