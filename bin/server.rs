// Student Report Card - Web Server
// Local HTTP form backed by one in-memory session

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use report_card::config::AppConfig;
use report_card::logging;
use report_card::server::{router, AppState};

#[derive(Parser)]
#[command(name = "report-card-server", version, about = "Student report card web form")]
struct Args {
    /// Config file path (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:3000
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?.with_bind_addr(args.bind);

    logging::init_stderr(&config.log_filter)?;

    let app = router(AppState::new());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "report card server listening");
    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/students", config.bind_addr);
    println!("\n   Press Ctrl+C to stop (records are kept only while the server runs)\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
