use anyhow::Result;
use dotenvy::dotenv;
use serde_json::json;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::signal;

use terabox_bot::cli::{Cli, Commands};
use terabox_bot::core::{init_logger, metrics, web_server, AppConfig, AppContext};
use terabox_bot::resolver::SizeEstimator;
use terabox_bot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point
///
/// Parses CLI arguments, loads configuration and dispatches to the subcommand.
/// Running without a subcommand starts the bot.
#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before the config is extracted
    let _ = dotenv();

    let cli = Cli::parse_args();

    // Backends catch their own panics; this only makes stray ones visible in the log
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {}", panic_info);
    }));

    let config = AppConfig::load_with_backend(cli.config.as_deref(), cli.backend)?;
    init_logger(&config.log_level, config.log_file.as_deref())?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(config).await,
        Commands::Resolve { url, json } => run_cli_resolve(config, &url, json).await,
        Commands::Estimate { size } => {
            let estimator = SizeEstimator::new(&config.estimator);
            println!("{}", estimator.estimate(&size));
            Ok(())
        }
    }
}

/// Runs the Telegram dispatcher and the keep-alive server until Ctrl-C.
async fn run_bot(config: AppConfig) -> Result<()> {
    config.log_summary();
    metrics::init_metrics();

    let bot = create_bot(&config.bot_token)?;
    let port = config.port;
    let ctx = AppContext::from_config(config)?;
    let backend = ctx.backend_name();
    let started = ctx.started;

    let web_server = tokio::spawn(async move {
        let shutdown = async {
            let _ = signal::ctrl_c().await;
        };
        if let Err(e) = web_server::start_web_server(port, backend, started, shutdown).await {
            log::error!("Keep-alive server failed: {}", e);
        }
    });

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    log::info!("🚀 Bot is running with the {} backend", backend);

    Dispatcher::builder(bot, schema(HandlerDeps::new(ctx)))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");

    if tokio::time::timeout(Duration::from_secs(5), web_server).await.is_err() {
        log::warn!("Keep-alive server did not stop within 5s");
    }
    Ok(())
}

/// Resolves one link and prints the descriptor.
async fn run_cli_resolve(config: AppConfig, url: &str, as_json: bool) -> Result<()> {
    let ctx = AppContext::from_config(config)?;
    let resolver = &ctx.resolver;

    let result = resolver.resolve(url).await?;
    let estimate = result
        .size_label
        .as_deref()
        .map(|label| resolver.estimator().estimate(label).to_string());

    if as_json {
        let output = json!({
            "file_name": result.file_name,
            "size": result.size_label,
            "download_url": result.download_url,
            "estimated_time": estimate,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("✅ Direct download link found");
        if let Some(name) = &result.file_name {
            println!("File: {}", name);
        }
        if let Some(size) = &result.size_label {
            println!("Size: {}", size);
        }
        if let Some(estimate) = &estimate {
            println!("Estimated download time: {}", estimate);
        }
        println!("Link: {}", result.download_url);
    }

    Ok(())
}
