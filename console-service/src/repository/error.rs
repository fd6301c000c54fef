//! Repository error types
//!
//! Every collaborator behind the handlers (canonical store, search index)
//! reports failures as a [`RepositoryError`]. The handler layer classifies
//! these into response outcomes; nothing here knows about HTTP.
//!
//! # Example
//!
//! ```rust
//! use console_service::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("Organization", "org_123");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert!(error.is_not_found());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Fetching a single record by ID
    FetchById,
    /// Counting records
    FetchCount,
    /// Fetching one page of records
    FetchPage,
    /// Querying the search index
    Search,
    /// Probing collaborator availability
    HealthCheck,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchById => write!(f, "fetch_by_id"),
            Self::FetchCount => write!(f, "fetch_count"),
            Self::FetchPage => write!(f, "fetch_page"),
            Self::Search => write!(f, "search"),
            Self::HealthCheck => write!(f, "health_check"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// A specific requested record does not exist
    NotFound,
    /// A list operation has no records at all at the data layer
    EmptyData,
    /// Failed to reach the backing service
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Serialization or deserialization error
    SerializationError,
    /// Search engine rejected or failed the query
    SearchFailed,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::EmptyData => write!(f, "empty_data"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::SearchFailed => write!(f, "search_failed"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
///
/// # Example
///
/// ```rust
/// use console_service::repository::{RepositoryError, RepositoryOperation};
///
/// let error = RepositoryError::empty_data(RepositoryOperation::FetchPage, "organization");
/// println!("{}", error); // "Repository empty_data error during fetch_page: No organization records available"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of record involved (e.g., "Organization")
    pub entity_type: Option<String>,
    /// The ID of the record involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    ///
    /// The message names both the type and the ID so it can be shown to the
    /// caller as-is.
    ///
    /// # Example
    ///
    /// ```rust
    /// use console_service::repository::RepositoryError;
    ///
    /// let error = RepositoryError::not_found("Organization", "org_123");
    /// assert_eq!(error.message, "Organization with id=org_123 not found");
    /// ```
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self {
            operation: RepositoryOperation::FetchById,
            kind: RepositoryErrorKind::NotFound,
            message: format!("{} with id={} not found", entity_type, entity_id),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }

    /// Create an "empty data" error for a list operation with nothing to list
    pub fn empty_data(operation: RepositoryOperation, collection: impl AsRef<str>) -> Self {
        Self::new(
            operation,
            RepositoryErrorKind::EmptyData,
            format!("No {} records available", collection.as_ref()),
        )
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
    }

    /// Create a search failure
    pub fn search_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Search,
            RepositoryErrorKind::SearchFailed,
            message,
        )
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether this error reports a missing record
    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }

    /// Whether this error reports an empty collection
    pub fn is_empty_data(&self) -> bool {
        self.kind == RepositoryErrorKind::EmptyData
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        match err {
            E::RowNotFound => Self::new(
                RepositoryOperation::FetchById,
                RepositoryErrorKind::NotFound,
                "Row not found",
            ),
            E::PoolTimedOut => Self::timeout(
                RepositoryOperation::FetchPage,
                "Connection pool timed out",
            ),
            E::PoolClosed => Self::connection_failed(
                RepositoryOperation::FetchPage,
                "Connection pool is closed",
            ),
            E::Io(e) => Self::connection_failed(RepositoryOperation::FetchPage, e.to_string()),
            E::Tls(e) => Self::connection_failed(
                RepositoryOperation::FetchPage,
                format!("TLS error: {}", e),
            ),
            E::ColumnDecode { index, source } => Self::serialization_error(
                RepositoryOperation::FetchPage,
                format!("Failed to decode column {}: {}", index, source),
            ),
            E::Decode(e) => {
                Self::serialization_error(RepositoryOperation::FetchPage, e.to_string())
            }
            other => Self::database_error(RepositoryOperation::FetchPage, other.to_string()),
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(RepositoryOperation::Search, err.to_string())
        } else if err.is_connect() {
            Self::connection_failed(RepositoryOperation::Search, err.to_string())
        } else if err.is_decode() {
            Self::serialization_error(RepositoryOperation::Search, err.to_string())
        } else {
            Self::search_failed(err.to_string())
        }
    }
}
