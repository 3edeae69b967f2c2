use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use explorer_core::ExplorerConfig;
use explorer_sync::FileSynchronizer;
use explorer_tools::{BuiltinToolExecutor, ExplorerContext};

mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "filesystem-explorer")]
#[command(about = "Filesystem explorer tool server")]
#[command(version)]
struct Cli {
    /// Local storage directory (created if missing; defaults to ./storage)
    #[arg(long, env = "EXPLORER_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// External upload directory mirrored into storage (defaults to ./uploads)
    #[arg(long, env = "EXPLORER_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,
}

fn init_logging(debug: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        // If RUST_LOG is set, it wins.
        env_logger::init();
        return;
    }

    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let cwd = std::env::current_dir()?;
    let storage_dir = cli.storage_dir.unwrap_or_else(|| cwd.join("storage"));
    let upload_dir = cli.upload_dir.unwrap_or_else(|| cwd.join("uploads"));

    let config = ExplorerConfig::new(storage_dir, upload_dir);
    config.ensure_directories()?;

    log::info!("Starting filesystem-explorer server");
    log::info!("  Storage path: {}", config.storage_dir.display());
    log::info!("  Upload path: {}", config.upload_dir.display());

    let mut synchronizer = FileSynchronizer::new(&config.upload_dir, &config.storage_dir);
    synchronizer.start_watching()?;

    let ctx = Arc::new(ExplorerContext::new(config));
    let executor = BuiltinToolExecutor::new(ctx);

    server::serve(&executor).await?;

    synchronizer.stop_watching();
    log::info!("Server shut down");
    Ok(())
}
