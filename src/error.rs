use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to open a session against the users database.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConnectionError(#[from] sqlx::Error);

/// Failure while dropping or recreating the `users` table.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SchemaError(#[from] sqlx::Error);

/// File-level failures that abort an import before or during reading.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("unable to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write import report: {0}")]
    Report(#[from] io::Error),
}

/// Which of the two name columns failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Name,
    Surname,
    Both,
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameField::Name => f.write_str("name"),
            NameField::Surname => f.write_str("surname"),
            NameField::Both => f.write_str("name and surname"),
        }
    }
}

/// Row-level failures. These are counted and reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("expected 3 fields (name, surname, email), found {fields}")]
    Structural { fields: usize },
    #[error("malformed row: {reason}")]
    Malformed { reason: String },
    #[error("invalid {field} format (name: '{name}', surname: '{surname}')")]
    InvalidName {
        field: NameField,
        name: String,
        surname: String,
    },
    #[error("invalid email format: '{email}'")]
    InvalidEmail { email: String },
    #[error("duplicate email: '{email}'")]
    DuplicateEmail { email: String },
    #[error("database error: {message}")]
    Storage { message: String },
}

/// What went wrong inside a [`crate::store::UserStore`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The email uniqueness constraint rejected the row.
    DuplicateEmail,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn duplicate_email(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::DuplicateEmail, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_field_describes_both_columns() {
        let err = RowError::InvalidName {
            field: NameField::Both,
            name: "J0hn".to_string(),
            surname: "Sm1th".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid name and surname format (name: 'J0hn', surname: 'Sm1th')"
        );
    }

    #[test]
    fn file_error_mentions_path() {
        let err = FileError::NotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert_eq!(err.to_string(), "file not found: missing.csv");
    }

    #[test]
    fn store_error_constructors_set_kind() {
        assert_eq!(
            StoreError::duplicate_email("dup").kind,
            StoreErrorKind::DuplicateEmail
        );
        assert_eq!(StoreError::other("boom").kind, StoreErrorKind::Other);
        assert_eq!(StoreError::other("boom").to_string(), "boom");
    }
}
