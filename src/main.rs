// src/main.rs
use clap::Parser;
use sports_proxy::cli::Args;
use sports_proxy::commands;
use sports_proxy::config::Config;
use sports_proxy::error::AppError;
use sports_proxy::logging::setup_logging;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, AppError> {
    let args = Args::parse();

    // Configuration maintenance commands need neither logging nor a provider
    if args.list_config {
        commands::handle_list_config_command().await?;
        return Ok(ExitCode::SUCCESS);
    }

    if args.new_base_url.is_some() || args.new_log_file_path.is_some() || args.clear_log_file_path {
        commands::handle_config_update_command(&args).await?;
        return Ok(ExitCode::SUCCESS);
    }

    // The guard must be kept alive until exit so buffered logs are flushed
    let (log_file_path, _guard) = setup_logging(&args).await?;
    info!("Logs are being written to: {log_file_path}");

    // Load config first to fail early if there's an issue
    let mut config = Config::load().await?;
    if let Some(base_url) = &args.base_url {
        config.api_base_url = base_url.clone();
        config.validate()?;
    }

    // Provider and registry are built inside and dropped on return, which
    // releases the upstream connection pool
    commands::run_operation(&args, &config).await
}
