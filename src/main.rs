mod config;
mod error;
mod handlers;
mod middleware;
mod response;
mod router;
mod state;
mod storage;
mod utils;

use std::net::SocketAddr;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--help") {
        println!("depot-server");
        println!("A file management server sandboxed to a single storage root.");
        println!();
        println!("USAGE:");
        println!("    depot-server [OPTIONS]");
        println!();
        println!("OPTIONS:");
        println!("    --addr=<ADDRESS>            Sets the server listening address. [env: ADDR] [default: 0.0.0.0:3001]");
        println!("    --storage-path=<PATH>       Sets the storage root directory. [env: STORAGE_PATH] [default: ./storage]");
        println!("    --max-file-size=<BYTES>     Sets the maximum file size for uploads in bytes. [env: MAX_FILE_SIZE] [default: 104857600]");
        println!();
        println!("    --help                      Prints this help information.");
        println!();

        process::exit(0);
    }

    init_tracing();

    // Load config
    let config = config::Config::load();
    tracing::info!("storage root: {:?}", config.storage_root);

    if let Err(err) = tokio::fs::create_dir_all(&config.storage_root).await {
        // Startup proceeds anyway; the health endpoint reports the root
        // as missing until an operator fixes it.
        tracing::warn!(%err, "failed to create storage root {:?}", config.storage_root);
    }

    // Initialize state
    let state = state::AppState::new(config.clone());

    // Create router
    let app = router::create_router(state);

    // Bind server
    let addr: SocketAddr = config.addr.parse().expect("Invalid address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("server running on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = wait_for_ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await;
    }

    tracing::info!("shutdown signal received, stopping server");
}

async fn wait_for_ctrl_c() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
