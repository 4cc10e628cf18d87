use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use contacts_config::ConfigProvider;
use contacts_server::start_server;
use contacts_store::InMemoryStore;

/// Serve the contacts app and its REST API.
#[derive(Parser, Debug)]
#[command(name = "contacts-server", version, about)]
struct Cli {
    /// Configuration file (default: contacts.{toml,yaml,json} in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Directory of static files
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Trace everything
    #[arg(short, long)]
    verbose: bool,

    /// Debug logging
    #[arg(short, long)]
    debug: bool,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.debug, cli.quiet);

    let provider = match &cli.config {
        Some(path) => ConfigProvider::new().with_file(path),
        None => ConfigProvider::new(),
    };
    let mut config = provider.load().context("loading configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(dir) = cli.static_dir {
        config.server.static_dir = dir;
    }
    if !config.server.shell_path().is_file() {
        tracing::warn!(
            "app shell {} not found; unknown paths will 404",
            config.server.shell_path().display()
        );
    }

    let (_, server) = start_server(&config.server, Arc::new(InMemoryStore::new())).await?;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutting down");
    server.abort();
    Ok(())
}

fn configure_logging(verbose: bool, debug: bool, quiet: bool) {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let log_level = if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::INFO
    };

    registry()
        .with(EnvFilter::new(format!("hyper=warn,{log_level}")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
