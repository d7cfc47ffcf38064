use anyhow::Result;
use clap::Parser;
use resume_analyzer::app_log;
use resume_analyzer::cli::{build_controller, handle_command, Cli};
use resume_analyzer::logging::init_logging;
use resume_analyzer::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.apply_overrides(ClientConfig::load()?)?;

    // Initialize logging before the first request
    init_logging(&config.log_file)?;

    app_log!(info, "Resume analyzer client starting");
    app_log!(info, "Environment: {}", config.environment);
    if let Some(path) = &config.config_file {
        app_log!(info, "Applied configuration file: {}", path.display());
    }
    app_log!(info, "Analysis service: {}", config.base_url);
    app_log!(info, "Output directory: {}", config.output_dir.display());
    app_log!(
        info,
        "Request timeout: {}",
        config
            .timeout_seconds
            .map(|secs| format!("{secs}s"))
            .unwrap_or_else(|| "none".to_string())
    );

    let controller = build_controller(&config)?;
    handle_command(cli.command, controller).await
}
