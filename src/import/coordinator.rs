//! Import coordination for CSV user files.
//!
//! The CsvImporter walks the records of one file in order:
//! 1. Reject rows without exactly three columns (a blank line is one empty column)
//! 2. Normalize and validate name, surname, email
//! 3. Insert through the store, or report what would be inserted (dry run)
//! 4. Print per-row diagnostics and the final tally

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use crate::error::{FileError, RowError, StoreError, StoreErrorKind};
use crate::import::lines::{RawRecord, RecordLines};
use crate::import::summary::{ImportSummary, RowFailure};
use crate::models::UserRecord;
use crate::store::UserStore;
use crate::validation::{check_names, is_valid_email};

/// Columns per record: name, surname, email.
pub const EXPECTED_FIELDS: usize = 3;

/// What happened to a row that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Committed {
    Simulated(UserRecord),
    Inserted { id: i32, user: UserRecord },
}

impl fmt::Display for Committed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Committed::Simulated(user) => write!(f, "[DRY RUN] Would insert: {user}"),
            Committed::Inserted { id, user } => write!(f, "Inserted: {user} with id {id}"),
        }
    }
}

/// Runs a CSV file through validation and into a [`UserStore`].
pub struct CsvImporter<'s, S> {
    store: &'s mut S,
    dry_run: bool,
}

impl<'s, S: UserStore> CsvImporter<'s, S> {
    /// In a dry run the store is never called.
    pub fn new(store: &'s mut S, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    /// Import every record of `path`, writing diagnostics and the summary to `out`.
    ///
    /// Returns an error only when the file cannot be opened or read, or when
    /// `out` rejects a write. Row problems end up in the returned summary.
    pub async fn import_file<W: Write>(
        &mut self,
        path: &Path,
        out: &mut W,
    ) -> Result<ImportSummary, FileError> {
        let file = open_input(path)?;
        log::info!(
            "importing users from {} (dry run: {})",
            path.display(),
            self.dry_run
        );

        let mut summary = ImportSummary::new(self.dry_run);

        for result in RecordLines::new(BufReader::new(file)) {
            let raw = result.map_err(|source| FileError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;

            match self.import_record(&raw).await {
                Ok(committed) => {
                    summary.record_success();
                    writeln!(out, "{committed}")?;
                }
                Err(error) => {
                    log::warn!("rejected line {}: {}", raw.line, error);
                    let failure = RowFailure {
                        line: raw.line,
                        error,
                    };
                    writeln!(out, "{failure}")?;
                    summary.record_failure(failure);
                }
            }
        }

        writeln!(out, "{summary}")?;
        log::info!(
            "import of {} finished: {} rows, {} succeeded, {} failed",
            path.display(),
            summary.total(),
            summary.successes,
            summary.errors
        );

        Ok(summary)
    }

    async fn import_record(&mut self, raw: &RawRecord) -> Result<Committed, RowError> {
        let record = raw.fields()?;
        if record.len() != EXPECTED_FIELDS {
            return Err(RowError::Structural {
                fields: record.len(),
            });
        }

        let user = UserRecord::normalized(&record[0], &record[1], &record[2]);

        if let Some(field) = check_names(&user.name, &user.surname) {
            return Err(RowError::InvalidName {
                field,
                name: user.name,
                surname: user.surname,
            });
        }

        if !is_valid_email(&user.email) {
            return Err(RowError::InvalidEmail { email: user.email });
        }

        if self.dry_run {
            return Ok(Committed::Simulated(user));
        }

        let id = match self.store.next_id().await {
            Ok(id) => id,
            Err(err) => return Err(row_error(err, user)),
        };

        match self.store.insert(id, &user).await {
            Ok(()) => Ok(Committed::Inserted { id, user }),
            Err(err) => Err(row_error(err, user)),
        }
    }
}

/// Import `path` into `store`, or only validate it when `dry_run` is set.
pub async fn process_csv<S: UserStore, W: Write>(
    path: &Path,
    store: &mut S,
    dry_run: bool,
    out: &mut W,
) -> Result<ImportSummary, FileError> {
    CsvImporter::new(store, dry_run).import_file(path, out).await
}

fn open_input(path: &Path) -> Result<File, FileError> {
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => FileError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FileError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn row_error(err: StoreError, user: UserRecord) -> RowError {
    match err.kind {
        StoreErrorKind::DuplicateEmail => RowError::DuplicateEmail { email: user.email },
        StoreErrorKind::Other => RowError::Storage {
            message: err.message,
        },
    }
}
