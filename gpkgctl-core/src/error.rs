/// Structured error types for gpkgctl-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (gpkgctl-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gpkgctl-core operations
#[derive(Error, Debug)]
pub enum GpkgError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// SQLite query or connection failed
    #[error("database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },

    /// Container file does not exist
    #[error("container not found: {path:?}")]
    ContainerNotFound { path: PathBuf },

    /// File exists but is not a usable GeoPackage
    #[error("invalid container {path:?}: {reason}")]
    InvalidContainer { path: PathBuf, reason: String },

    /// Column declares a type the schema model does not know
    #[error("unknown field type '{declared}' for {table}.{column}")]
    UnknownFieldType {
        table: String,
        column: String,
        declared: String,
    },

    /// Constraint row carries an unknown constraint_type tag
    #[error("unknown constraint type '{kind}' in constraint '{name}'")]
    UnknownConstraintType { name: String, kind: String },

    /// Constraint rows for one name disagree about their kind
    #[error("malformed domain '{name}': {reason}")]
    MalformedDomain { name: String, reason: String },

    /// Requested table is not in the catalog
    #[error("table not found: {name}")]
    TableNotFound { name: String },

    /// Requested domain is not in the catalog
    #[error("domain not found: {name}")]
    DomainNotFound { name: String },
}

/// Result type alias for gpkgctl-core operations
pub type Result<T> = std::result::Result<T, GpkgError>;

impl GpkgError {
    /// Create a container not found error
    pub fn container_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ContainerNotFound { path: path.into() }
    }

    /// Create an invalid container error
    pub fn invalid_container(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidContainer {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown field type error
    pub fn unknown_field_type(
        table: impl Into<String>,
        column: impl Into<String>,
        declared: impl Into<String>,
    ) -> Self {
        Self::UnknownFieldType {
            table: table.into(),
            column: column.into(),
            declared: declared.into(),
        }
    }

    /// Create an unknown constraint type error
    pub fn unknown_constraint_type(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnknownConstraintType {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Create a malformed domain error
    pub fn malformed_domain(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDomain {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a table not found error
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound { name: name.into() }
    }

    /// Create a domain not found error
    pub fn domain_not_found(name: impl Into<String>) -> Self {
        Self::DomainNotFound { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GpkgError::unknown_field_type("parks", "status", "VARCHAR2");
        assert_eq!(
            err.to_string(),
            "unknown field type 'VARCHAR2' for parks.status"
        );

        let err = GpkgError::invalid_container("/tmp/test.gpkg", "missing gpkg_contents");
        assert!(err.to_string().contains("invalid container"));
        assert!(err.to_string().contains("/tmp/test.gpkg"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let gpkg_err: GpkgError = io_err.into();

        assert!(matches!(gpkg_err, GpkgError::Io { .. }));
    }
}
