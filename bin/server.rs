// Bank Account Manager - Web Server
// Serves the account UI and JSON API over the credit.dat table

use anyhow::{Context, Result};
use bank_manager::api::{router, AppState};
use bank_manager::{ServerConfig, StorageConfig, VERSION};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "bank-server", version, about = "Web front-end for the bank account table")]
struct Cli {
    #[command(flatten)]
    storage: StorageConfig,

    #[command(flatten)]
    server: ServerConfig,
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!("🌐 Bank Account Manager - Web Server v{}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let service = cli
        .storage
        .open_service()
        .with_context(|| format!("Failed to open data file {}", cli.storage.data_file.display()))?;
    println!("✓ Data file opened: {}", service.data_file().display());
    println!("✓ Exports go to:    {}", service.export_dir().display());

    let app = router(AppState::new(service), &cli.server.static_dir);

    let listener = tokio::net::TcpListener::bind(&cli.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", cli.server.bind))?;

    println!("\n🚀 Server running on http://{}", cli.server.bind);
    println!("   API: http://{}/api/accounts", cli.server.bind);
    println!("   UI:  http://{}", cli.server.bind);
    println!("\n   Press Ctrl+C to stop\n");
    info!("Listening on {}", cli.server.bind);

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
