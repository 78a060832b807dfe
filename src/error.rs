use std::fmt;

/// Result type alias for the documentation engine
pub type Result<T> = std::result::Result<T, Error>;

/// Which payload of an endpoint a schema belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Request => write!(f, "request"),
            Direction::Response => write!(f, "response"),
        }
    }
}

/// Error types for the documentation engine
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// An `#[api_group]` or `#[endpoint]` attribute could not be read
    InvalidDescriptor { item: String, message: String },
    /// A requested handler-group name has no type definition in the scanned sources
    UnknownHandlerGroup(String),
    MissingGroupDescriptor(String),
    ConflictingSchemaSource { handler: String, direction: Direction },
    /// A field required by the output contract is absent; carries the field path
    ValidationError(String),
    NullHostError,
    SerializationError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::InvalidDescriptor { item, message } => {
                write!(f, "invalid descriptor on {}: {}", item, message)
            }
            Error::UnknownHandlerGroup(name) => {
                write!(f, "handler group {} is not defined in the scanned sources", name)
            }
            Error::MissingGroupDescriptor(name) => {
                write!(f, "type {} is not annotated with #[api_group]", name)
            }
            Error::ConflictingSchemaSource { handler, direction } => write!(
                f,
                "cannot use both {dir}_field and {dir}_type; please use one method -> {handler}",
                dir = direction,
                handler = handler
            ),
            Error::ValidationError(field) => write!(f, "API {} must not be null", field),
            Error::NullHostError => write!(f, "Server instance cannot be null"),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization failed: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization failed: {}", err))
    }
}
