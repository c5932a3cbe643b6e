mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use wg_core::{Gateway, GatewayResult, SearchLimit};
use wg_web::{create_app, AppState};

use crate::config::{Cli, Commands};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("👋 Shutting down");
}

fn print_json<T: Serialize>(result: GatewayResult<T>) -> anyhow::Result<()> {
    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.log_file.as_deref())?;

    let gateway = Gateway::new(cli.upstream.knowledge_base()?, cli.upstream.language.clone());
    info!(
        "🧠 Knowledge base initialized (using {}, default language {})",
        gateway.backend_name(),
        gateway.default_language()
    );

    match cli.command {
        Commands::Serve { addr } => {
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            info!("🌐 Listening on http://{}", listener.local_addr()?);
            let app = create_app(AppState::new(gateway));
            wg_web::serve(listener, app, shutdown_signal()).await?;
        }
        Commands::Search { query, limit } => {
            print_json(gateway.search(&query, SearchLimit::clamped(limit)).await)?;
        }
        Commands::Summary { title } => {
            print_json(gateway.summary(&title).await)?;
        }
        Commands::Random { language } => {
            print_json(gateway.random(language.as_ref()).await)?;
        }
    }

    Ok(())
}
