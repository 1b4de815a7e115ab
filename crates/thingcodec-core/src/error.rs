/*!
 * Error types for thingcodec.
 *
 * Conversions themselves never fail: an unsupported input simply produces no value.
 * These errors cover building codecs, property tables and configuration.
 */
use thiserror::Error;

/// Error type for thingcodec operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A property was bound twice in the same table
    #[error("Duplicate binding for property: {0}")]
    DuplicateBinding(String),

    /// A codec factory was registered twice for the same model
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    /// No codec is known for the requested device model
    #[error("Unknown device model: {0}")]
    UnknownModel(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for thingcodec operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config<S: AsRef<str>>(msg: S) -> Self {
        Error::Config(msg.as_ref().to_string())
    }

    /// Create a new duplicate binding error
    pub fn duplicate_binding<S: AsRef<str>>(property: S) -> Self {
        Error::DuplicateBinding(property.as_ref().to_string())
    }

    /// Create a new already registered error
    pub fn already_registered<S: AsRef<str>>(msg: S) -> Self {
        Error::AlreadyRegistered(msg.as_ref().to_string())
    }

    /// Create a new unknown model error
    pub fn unknown_model<S: AsRef<str>>(model: S) -> Self {
        Error::UnknownModel(model.as_ref().to_string())
    }

    /// Create a new not found error
    pub fn not_found<S: AsRef<str>>(msg: S) -> Self {
        Error::NotFound(msg.as_ref().to_string())
    }

    /// Create a new other error
    pub fn other<S: AsRef<str>>(msg: S) -> Self {
        Error::Other(msg.as_ref().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
