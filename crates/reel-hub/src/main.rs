use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reel_hub::config::MountConfig;
use reel_hub::{build_router, AppState, Config};

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(
    name = "reel-hub",
    version,
    about = "REEL film query server"
)]
struct Args {
    /// Path to config file
    #[arg(long, default_value = "reel-hub.toml")]
    config: PathBuf,

    /// JSON content file to mount (replaces mounts from the config file)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Mount path for --content
    #[arg(long, default_value = "/content/oscars")]
    mount: String,

    /// Serve containers from a directory tree instead of content files
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Server bind address (overrides the config file)
    #[arg(long)]
    bind: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(file) = &self.content {
            config.source.mounts = vec![MountConfig {
                path: self.mount.clone(),
                file: file.clone(),
            }];
        }
        if let Some(dir) = &self.content_dir {
            config.source.directory = Some(dir.clone());
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "reel_hub=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    let state = match AppState::from_config(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to load content: {}", e);
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match config.server.bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid bind address {:?}: {}", config.server.bind, e);
            std::process::exit(1);
        }
    };

    let containers = state.source.containers();
    let app = build_router(state.clone(), &config.server);

    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    tracing::info!("  🎬 REEL v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  Query:      http://{}/<container>.json", addr);
    tracing::info!("  API:        http://{}/api/status", addr);
    tracing::info!("  Source:     {:?}", state.source_kind);
    tracing::info!("  Containers: {}", containers.join(", "));
    tracing::info!("  Limit mode: {:?}", config.query.limit_mode);
    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Shut down cleanly");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
