/// Mooseek Server - local-network media player backend
use clap::{Parser, Subcommand};
use mooseek_core::CatalogProvider;
use mooseek_metadata::{DirectoryCatalog, ScanConfig};
use mooseek_server::{build_state, create_router, ServerConfig};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mooseek-server")]
#[command(about = "Mooseek streaming server and playback sync hub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "MOOSEEK_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Scan a directory and print the catalog as JSON
    Scan {
        /// Directory path to scan
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mooseek_server=info,mooseek_playback=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Scan { path } => {
            scan_directory(path).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Mooseek server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Library: {}", config.library.root.display());

    let app_state = build_state(&config).await?;
    tracing::info!(
        "Catalog ready with {} tracks, {} assets",
        app_state.catalog.tracks().len(),
        app_state.assets.len()
    );

    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn scan_directory(path: PathBuf) -> anyhow::Result<()> {
    let catalog = DirectoryCatalog::new(path, ScanConfig::default());
    let tracks = tokio::task::spawn_blocking(move || catalog.list_tracks()).await??;

    println!("{}", serde_json::to_string_pretty(&tracks)?);
    tracing::info!("Scanned {} tracks", tracks.len());
    Ok(())
}
