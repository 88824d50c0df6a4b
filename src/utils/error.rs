use thiserror::Error;

/// 組請求時無法對應到承運商欄位
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Unknown {field} '{value}' for package {package_id}")]
    UnknownCode {
        field: &'static str,
        value: String,
        package_id: String,
    },

    #[error("Unknown {field} '{value}'")]
    UnknownSetting { field: &'static str, value: String },

    #[error("Options reference package '{package_id}' which is not part of the shipment")]
    UnknownPackage { package_id: String },

    #[error("Missing required option: {field}")]
    MissingOption { field: &'static str },

    #[error("No carriers specified for rate request")]
    NoCarriers,

    #[error("{carrier} does not support the {operation} operation")]
    Unsupported {
        carrier: String,
        operation: &'static str,
    },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Request build failed: {0}")]
    BuildError(#[from] BuildError),

    #[error("Unknown carrier: {carrier_id}")]
    UnknownCarrierError { carrier_id: String },

    #[error("Invalid input {path}: {message}")]
    InvalidInputError { path: String, message: String },

    #[error("Transport error: {message}")]
    TransportError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端用法錯誤（未知承運商、選項不合法）
    Contract,
    Transport,
    Configuration,
    System,
}

impl BridgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::BuildError(_)
            | BridgeError::UnknownCarrierError { .. }
            | BridgeError::InvalidInputError { .. } => ErrorCategory::Contract,
            BridgeError::TransportError { .. } => ErrorCategory::Transport,
            BridgeError::ConfigError { .. }
            | BridgeError::ConfigValidationError { .. }
            | BridgeError::InvalidConfigValueError { .. }
            | BridgeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BridgeError::IoError(_) | BridgeError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Contract => format!("Invalid request: {}", self),
            ErrorCategory::Transport => format!("Could not reach the carrier: {}", self),
            ErrorCategory::Configuration => format!("Please check your configuration: {}", self),
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
