mod api;
mod feed;
mod options;
mod router;
mod rules;
mod startup;
mod state;
mod templates;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Alert rule generation and validation service.
#[derive(Debug, Parser)]
#[command(name = "rulegen-server")]
struct Cli {
    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the template seed directory.
    #[arg(long)]
    seed_dir: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    rulegen_core::config::load_dotenv();
    let mut config = rulegen_core::Config::from_env();

    let cli = Cli::parse();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(seed_dir) = cli.seed_dir {
        config.templates.seed_dir = Some(seed_dir);
    }

    let state = startup::build_app_state(&config).await?;
    let app = router::build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
