use thiserror::Error;

/// 遠端通道錯誤 (傳輸層)
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("channel to {endpoint} is closed")]
    Closed { endpoint: String },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote call {method} returned HTTP {status}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },

    #[error("could not decode reply from {method}: {details}")]
    Decode { method: String, details: String },
}

#[derive(Error, Debug)]
pub enum BetError {
    #[error("Invalid bet: {message}")]
    ValidationError { message: String },

    #[error("Credential denied: {reason}")]
    IssuanceDenied { reason: String },

    #[error("Credential service unreachable: {cause}")]
    IssuanceUnreachable { cause: String },

    #[error("Registration rejected: {reason}")]
    RegistrationRejected { reason: String },

    #[error("Registration service unreachable: {cause}")]
    RegistrationUnreachable { cause: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Remote channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BetError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::IssuanceDenied { .. } | Self::IssuanceUnreachable { .. } => ErrorSeverity::Medium,
            Self::Channel(_) | Self::ApiError(_) => ErrorSeverity::Medium,
            Self::RegistrationRejected { .. } => ErrorSeverity::High,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::High,
            Self::RegistrationUnreachable { .. } | Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Choose 5 distinct numbers between 1 and 50 and 2 distinct stars between 1 and 12"
            }
            Self::IssuanceDenied { .. } => "Top up the account or try again with a different account",
            Self::IssuanceUnreachable { .. } => {
                "The credit service is unavailable; retry the whole bet later"
            }
            Self::RegistrationRejected { .. } => {
                "The cheque was spent; contact support with the credential reference"
            }
            Self::RegistrationUnreachable { .. } => {
                "The cheque was spent but the bet may not be recorded; contact support with the credential reference"
            }
            Self::Internal { .. } => "Unexpected failure; check the server logs",
            Self::Channel(_) | Self::ApiError(_) => {
                "Check GRPC_SERVER and GRPC_USE_TLS and that the remote service is up"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration value and restart"
            }
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "The remote service sent an unexpected payload",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::IssuanceDenied { reason } => reason.clone(),
            Self::IssuanceUnreachable { cause } => {
                format!("Could not contact CrediBank: {}", cause)
            }
            Self::RegistrationRejected { reason } => reason.clone(),
            Self::RegistrationUnreachable { cause } => {
                format!("Could not contact EuroMilRegister: {}", cause)
            }
            Self::Internal { .. } => "Internal server error.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BetError>;
