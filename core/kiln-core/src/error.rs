//! Error types for the Kiln execution core.
//!
//! All public APIs return `KilnResult<T>`. No panics in library code.

use thiserror::Error;

/// Unified error type for all Kiln operations.
#[derive(Debug, Error)]
pub enum KilnError {
    /// Storage backend failure (write, scan, encoding)
    #[error("storage error: {0}")]
    Storage(String),

    /// Apache Arrow error (RecordBatch operations)
    #[error("arrow error: {source}")]
    Arrow {
        #[from]
        source: arrow::error::ArrowError,
    },

    /// sled embedded database error
    #[error("sled error: {source}")]
    Sled {
        #[from]
        source: sled::Error,
    },

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Schema definition or validation error
    #[error("schema error: {0}")]
    Schema(String),

    /// Requested table does not exist
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// Table already registered in the catalog
    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Requested job does not exist
    #[error("job '{0}' not found")]
    JobNotFound(String),

    /// Job name collision
    #[error("A job with name {0} already exists.")]
    JobAlreadyExists(String),

    /// Datetime string matched neither accepted pattern
    #[error("{0} does not match the expected date or datetime format")]
    UnrecognizedDatetime(String),

    /// Datetime string looked right but is not a valid calendar value
    #[error("{input} is not in the correct {kind} format. expected format: {expected_format}.")]
    InvalidDatetime {
        input: String,
        kind: &'static str,
        expected_format: &'static str,
    },

    /// Invalid arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Configuration could not be loaded or applied
    #[error("config error: {0}")]
    Config(String),

    /// UDF input/output did not satisfy its declared signature
    #[error("UDF input/output contract violated: {0}")]
    ContractViolation(String),

    /// Callable not found
    #[error("callable '{0}' not found")]
    CallableNotFound(String),

    /// Duplicate callable registration
    #[error("callable '{0}' already registered")]
    DuplicateCallable(String),

    /// Invalid operation
    #[error("invalid operation: {message}\nContext: {context}")]
    InvalidOperation { message: String, context: String },
}

/// Coarse classification used by callers to decide how to react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced table, job or callable does not exist
    NotFound,
    /// Name collision (job, table, callable)
    Conflict,
    /// Unparseable or out-of-range user input
    MalformedInput,
    /// UDF shape, type or column-name mismatch
    ContractViolation,
    /// Backend write/read failure
    StorageFailure,
    /// Misconfigured pipeline or other internal fault
    Internal,
}

impl KilnError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KilnError::TableNotFound(_)
            | KilnError::JobNotFound(_)
            | KilnError::CallableNotFound(_) => ErrorKind::NotFound,
            KilnError::TableAlreadyExists(_)
            | KilnError::JobAlreadyExists(_)
            | KilnError::DuplicateCallable(_) => ErrorKind::Conflict,
            KilnError::UnrecognizedDatetime(_)
            | KilnError::InvalidDatetime { .. }
            | KilnError::InvalidArguments(_)
            | KilnError::Config(_)
            | KilnError::Schema(_) => ErrorKind::MalformedInput,
            KilnError::ContractViolation(_) => ErrorKind::ContractViolation,
            KilnError::Storage(_)
            | KilnError::Arrow { .. }
            | KilnError::Sled { .. }
            | KilnError::Io { .. }
            | KilnError::Serialization(_) => ErrorKind::StorageFailure,
            KilnError::InvalidOperation { .. } => ErrorKind::Internal,
        }
    }

    /// Only storage failures may be retried, and only by a caller outside the core.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StorageFailure
    }
}

/// Result type alias for all Kiln operations.
pub type KilnResult<T> = Result<T, KilnError>;

impl From<serde_json::Error> for KilnError {
    fn from(err: serde_json::Error) -> Self {
        KilnError::Serialization(err.to_string())
    }
}
