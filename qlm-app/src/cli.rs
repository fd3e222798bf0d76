use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "qlm")]
#[command(about = "Word-learning frequency experiment: session runner and save endpoint")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one participant session
    Run(RunArgs),
    /// Serve the save endpoint, appending received data under a directory
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// TOML experiment config; built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save endpoint URL, overrides the config
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Answer every screen with a simulated participant on a virtual clock
    #[arg(long)]
    pub simulate: bool,

    /// Seed for trial order and simulated answers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write every stage result to this JSON file at the end
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Directory for lines that could not be saved, overrides the config
    #[arg(long)]
    pub fallback_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Directory data files are appended under
    #[arg(long, default_value = "server_data")]
    pub dir: PathBuf,

    /// TCP address to bind
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,
}
