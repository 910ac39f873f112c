use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use wine_quality_service::app;
use wine_quality_service::config::Config;
use wine_quality_service::data::loader;
use wine_quality_service::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::info!("{config:?}");

    let dataset = loader::load_file(&config.dataset_path)
        .with_context(|| format!("loading dataset {}", config.dataset_path.display()))?;
    let levels = dataset
        .quality_levels()
        .iter()
        .map(|(q, n)| format!("{q}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    log::info!(
        "loaded {} rows x {} columns; quality levels {{{levels}}}",
        dataset.len(),
        dataset.columns.len()
    );

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

    let router = app::router(AppState::new(dataset, config.output_dir.clone()));
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    log::info!("listening on {}", config.bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    log::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("listening for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
