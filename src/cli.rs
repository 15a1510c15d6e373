use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use sqlx::postgres::PgConnection;

use crate::config::ConnectionConfig;
use crate::db;
use crate::error::FileError;
use crate::import::process_csv;
use crate::schema;
use crate::store::PgUserStore;

/// How a run ended; maps onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::Failure => ExitCode::from(1),
        }
    }
}

/// `-h` is the database host, so clap's short help flag is disabled.
#[derive(Parser, Debug)]
#[command(
    name = "user_upload",
    about = "Validate a CSV of users and load it into the PostgreSQL users table",
    disable_help_flag = true
)]
pub struct Args {
    /// PostgreSQL host, optionally as `host:port`.
    #[arg(short = 'h', value_name = "HOST")]
    pub host: Option<String>,

    /// PostgreSQL username.
    #[arg(short = 'u', value_name = "USER")]
    pub username: Option<String>,

    /// PostgreSQL password.
    #[arg(short = 'p', value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Name of the CSV file to be parsed.
    #[arg(long, value_name = "CSV_FILE")]
    pub file: Option<PathBuf>,

    /// Create (or rebuild) the PostgreSQL users table; no other action is taken.
    #[arg(long = "create_table")]
    pub create_table: bool,

    /// Run the import without inserting into the database.
    #[arg(long = "dry_run")]
    pub dry_run: bool,

    /// Display this help message.
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

/// Connect, then either rebuild the table or import `--file`.
///
/// Everything the operator sees is written to `out`. The `Err` case is
/// reserved for `out` itself failing.
pub async fn run<W: Write>(args: Args, out: &mut W) -> io::Result<RunStatus> {
    let (Some(host), Some(username), Some(password)) = (
        args.host.as_deref(),
        args.username.as_deref(),
        args.password.as_deref(),
    ) else {
        writeln!(
            out,
            "Error: Database connection parameters (-h, -u, -p) are required."
        )?;
        return Ok(RunStatus::Failure);
    };

    let config = ConnectionConfig::from_args(host, username, password);

    let mut session = match db::connect(&config).await {
        Ok(session) => {
            writeln!(out, "Successfully connected to the database.")?;
            session
        }
        Err(err) => {
            log::error!("connection to {}:{} failed: {}", config.host, config.port, err);
            writeln!(out, "Connection failed: {err}")?;
            return Ok(RunStatus::Failure);
        }
    };

    let result = dispatch(&args, &mut session, out).await;

    if let Err(err) = db::close(session).await {
        log::warn!("failed to close database session: {}", err);
    }

    result
}

async fn dispatch<W: Write>(
    args: &Args,
    session: &mut PgConnection,
    out: &mut W,
) -> io::Result<RunStatus> {
    if args.create_table {
        return match schema::create_table(session).await {
            Ok(()) => {
                writeln!(out, "Table '{}' created successfully.", schema::USERS_TABLE)?;
                Ok(RunStatus::Success)
            }
            // Reported only; the exit status stays 0.
            Err(err) => {
                log::error!("table creation failed: {}", err);
                writeln!(out, "Error creating table: {err}")?;
                Ok(RunStatus::Success)
            }
        };
    }

    let Some(path) = args.file.as_deref() else {
        writeln!(
            out,
            "Error: --file [csv file name] is required to import users (see --help)."
        )?;
        return Ok(RunStatus::Failure);
    };

    let mut store = PgUserStore::new(session);
    match process_csv(path, &mut store, args.dry_run, out).await {
        Ok(_) => Ok(RunStatus::Success),
        Err(FileError::Report(err)) => Err(err),
        Err(err) => {
            log::error!("import aborted: {}", err);
            writeln!(out, "Error: {err}")?;
            Ok(RunStatus::Failure)
        }
    }
}
