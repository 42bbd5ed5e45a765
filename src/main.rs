mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yaya_dashboard::config::{Config, ConfigInfo, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_info = Config::from_env()?;
    init_tracing(config_info.config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config_info).await,
        Commands::Config => cli::handle_config_validate(&config_info),
        Commands::Check { query } => cli::handle_check(&config_info, &query).await,
    }
}

fn init_tracing(format: LogFormat) {
    let (json, text) = match format {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
        LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(json)
        .with(text)
        .init();
}

async fn serve(config_info: ConfigInfo) -> anyhow::Result<()> {
    let ConfigInfo {
        config,
        profile,
        overrides,
    } = config_info;

    tracing::info!(
        profile = profile.as_str(),
        overrides = ?overrides,
        settings = ?config.summary(),
        "Configuration loaded"
    );
    if config.current_account_id.is_none() {
        tracing::warn!("CURRENT_USER_ACCOUNT_ID is not set; only top-ups will show as incoming");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = yaya_dashboard::create_app(yaya_dashboard::AppState::from_config(config));

    tracing::info!("YaYa Wallet Dashboard API listening on {}", addr);
    axum::Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
