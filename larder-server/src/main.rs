use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use larder_server::{
    backend::GeminiBackend,
    config::{Args, Config},
    routes::{app, AppState},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // Parse command line arguments
    let args = Args::parse();

    // initialize tracing
    let _guard = match &args.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "access.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            None
        }
    };

    let config = Config::load(&args);
    tracing::info!(?config, "Starting generation proxy");

    let backend = GeminiBackend::new(reqwest::Client::new(), &config.upstream, config.api_key);
    let app = app(AppState {
        backend: Arc::new(backend),
        default_model: config.default_model,
    });

    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .with_context(|| format!("Binding to {}", config.address))?;
    tracing::info!("Listening on {}", config.address);
    axum::serve(listener, app).await.context("Serving HTTP")?;
    Ok(())
}
