mod api;
mod cli;
mod client;
mod config;
mod records;
#[cfg(test)]
mod testing;

use clap::Parser;
use cli::Cli;
use log::error;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let cli = Cli::parse();

    // Build the stderr logger.
    let env_logger = env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_file(false)
        .format_target(false)
        .format_timestamp(None)
        .build();

    // Wrap the logger so log messages and the upload spinner don't interfere
    // with each other.
    let progress = indicatif::MultiProgress::new();
    if let Err(err) =
        indicatif_log_bridge::LogWrapper::new(progress.clone(), env_logger)
            .try_init()
    {
        eprintln!("Failed to initialize logger: {err}");
    }

    // Run the upload
    std::process::exit(exit_code(cli.run(&progress)));
}

/// Log the error, if any, and map the run's outcome to an exit status.
fn exit_code(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{}", err);
            1
        }
    }
}
