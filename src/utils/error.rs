use thiserror::Error;

#[derive(Error, Debug)]
pub enum EasyShipError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Response parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Service returned error {code}: {message}")]
    ServiceError { code: String, message: String },

    #[error("Unexpected response content: {message}")]
    UnexpectedResponseError { message: String },
}

pub type Result<T> = std::result::Result<T, EasyShipError>;
