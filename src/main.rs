use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use optipix::config::Config;
use optipix::storage::S3Store;

/// Optipix - on-the-fly image optimization with an S3 read-through cache
#[derive(Parser, Debug)]
#[command(name = "optipix")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize logging subsystem
    optipix::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration from file and environment
    let config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        bucket = %config.storage.bucket,
        region = %config.storage.region,
        "Configuration loaded successfully"
    );

    // Storage client is built once and shared across all invocations
    let store = Arc::new(S3Store::connect(&config.storage).await);

    if let Err(err) = optipix::server::run(&config.server, store).await {
        tracing::error!(error = %err, "server terminated");
        std::process::exit(1);
    }
}
