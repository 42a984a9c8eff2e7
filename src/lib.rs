pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod personalize;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use config::MailBackend;
use state::SharedState;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    if matches!(cli.command, Some(Commands::Init)) {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    if matches!(cli.command, None | Some(Commands::Serve)) {
        config.validate()?;
    } else {
        config.validate_core()?;
    }

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    init_tracing(&config)?;

    if prometheus_handle.is_some() {
        info!("Prometheus metrics recorder initialized");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config, prometheus_handle).await,
        Commands::Init => Ok(()),
        Commands::Seed => cli::cmd_seed(&config).await,
        Commands::Reset { yes } => cli::cmd_reset(&config, yes).await,
        Commands::Users => cli::cmd_list_users(&config).await,
        Commands::Templates => cli::cmd_list_templates(&config).await,
        Commands::History { limit } => cli::cmd_history(&config, limit).await,
        Commands::HashPassword { password } => cli::cmd_hash_password(&config, &password),
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json_logs = config.observability.json_logs;
    let json_layer = json_logs.then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!json_logs).then(tracing_subscriber::fmt::layer);

    let loki_layer = if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder();
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key.as_str(), value.as_str())?;
        }
        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(loki_layer)
        .init();

    if config.observability.loki_enabled {
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    }

    Ok(())
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Email Engine v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;
    let shared = Arc::new(SharedState::new(config).await?);

    let report = shared
        .store
        .seed(&shared.config.seed, &shared.config.security)
        .await
        .context("Failed to seed database")?;
    if report.admin_created && shared.config.seed.admin_password == "admin123" {
        warn!("Bootstrap admin uses the default password; change seed.admin_password");
    }

    check_mailer(&shared).await;

    let state = api::create_app_state(shared, prometheus_handle);
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// A failed probe is logged, not fatal: individual sends report their own
/// errors.
async fn check_mailer(shared: &SharedState) {
    let mail = &shared.config.mail;

    if mail.backend == MailBackend::Console {
        warn!("Mail backend is 'console'; emails are logged, not delivered");
        return;
    }

    if !mail.verify_on_startup {
        return;
    }

    match shared.mailer.verify().await {
        Ok(true) => info!(host = %mail.host, port = mail.port, "SMTP server is ready"),
        Ok(false) => warn!(host = %mail.host, port = mail.port, "SMTP server rejected the probe"),
        Err(e) => error!(host = %mail.host, port = mail.port, error = %e, "SMTP connection check failed"),
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
