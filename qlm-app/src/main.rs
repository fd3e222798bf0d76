mod app;
mod cli;
mod participant;
mod server;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use app::App;
use cli::{Cli, Command};

/// `RUST_LOG` overrides the default filter. Logs go to stderr so they never
/// interleave with the participant's screens on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    match Cli::parse().command {
        Command::Run(args) => App::new(args)?.run().await,
        Command::Serve(args) => server::serve(args).await,
    }
}
