use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Store request failed with status {status}: {message}")]
    StoreError { status: u16, message: String },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Photo library failed to load: {message}")]
    PhotoLibraryError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Store,
    Auth,
    Imagery,
    Data,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::StoreError { .. } => ErrorCategory::Store,
            Self::AuthError { .. } | Self::NotSignedIn => ErrorCategory::Auth,
            Self::PhotoLibraryError { .. } => ErrorCategory::Imagery,
            Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ValidationError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Imagery => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Store => ErrorSeverity::Medium,
            ErrorCategory::Auth | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(e) if e.is_timeout() => "The request timed out".to_string(),
            Self::HttpError(_) => "Could not reach the server".to_string(),
            Self::StoreError { message, .. } => format!("The venue store rejected the request: {}", message),
            Self::AuthError { message } => message.clone(),
            Self::NotSignedIn => "You need to sign in first".to_string(),
            Self::MissingConfigError { field } => format!("Missing required environment variable: {}", field),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the SUPABASE_URL setting",
            ErrorCategory::Store => "Check that the venues table exists and that your account may access it",
            ErrorCategory::Auth => "Check your email and password, and confirm your email address",
            ErrorCategory::Imagery => "Check GOOGLE_MAPS_API_KEY; street view images are used meanwhile",
            ErrorCategory::Data => "Check the values you entered",
            ErrorCategory::Config => "Set the missing variables in the environment or the config file",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let e = PlannerError::MissingConfigError {
            field: "GOOGLE_MAPS_API_KEY".to_string(),
        };
        assert_eq!(e.category(), ErrorCategory::Config);
        assert_eq!(e.severity(), ErrorSeverity::Critical);
        assert_eq!(
            e.user_friendly_message(),
            "Missing required environment variable: GOOGLE_MAPS_API_KEY"
        );
    }

    #[test]
    fn test_auth_message_is_shown_verbatim() {
        let e = PlannerError::AuthError {
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(e.user_friendly_message(), "Invalid login credentials");
        assert_eq!(e.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_photo_failures_are_low_severity() {
        let e = PlannerError::PhotoLibraryError {
            message: "timed out".to_string(),
        };
        assert_eq!(e.severity(), ErrorSeverity::Low);
    }
}
