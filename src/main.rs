use std::io;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use user_upload::cli::{self, Args};
use user_upload::config::DEFAULT_LOG_FILTER;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    let mut out = io::stdout().lock();

    match cli::run(args, &mut out).await {
        Ok(status) => status.into(),
        Err(err) => {
            log::error!("failed to write to stdout: {}", err);
            ExitCode::FAILURE
        }
    }
}
