//! CSV user import.
//!
//! Each record of the input file goes through the same steps:
//!
//! 1. **Structure** - exactly three columns: name, surname, email. A blank
//!    line is a record with one empty column
//! 2. **Normalization** - trim, title-case names, lower-case email
//! 3. **Validation** - names first, then email
//! 4. **Commit** - insert through a [`UserStore`](crate::store::UserStore), or
//!    only report the row in a dry run
//!
//! Row failures are printed with their line number and counted; only
//! file-level problems stop the run.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use user_upload::import::process_csv;
//! use user_upload::store::PgUserStore;
//!
//! let mut store = PgUserStore::new(&mut conn);
//! let summary = process_csv(path, &mut store, false, &mut std::io::stdout()).await?;
//! println!("{} rows imported", summary.successes);
//! ```

pub mod coordinator;
pub mod lines;
pub mod summary;

pub use coordinator::{CsvImporter, process_csv};
pub use lines::{RawRecord, RecordLines};
pub use summary::{ImportSummary, MAX_RETAINED_FAILURES, RowFailure};
