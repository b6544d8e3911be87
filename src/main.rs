use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use kma_nowcast::config::Config;
use kma_nowcast::logging::{init_logging, LogLevel};
use kma_nowcast::server::{self, NowcastMcpServer};
use kma_nowcast::Nowcaster;

#[derive(Parser, Debug)]
#[command(name = "kma_nowcast", version, about = "KMA ultra-short-term nowcast MCP server")]
struct Cli {
    /// Serve MCP over HTTP instead of stdio
    #[arg(long)]
    http_stream: bool,

    /// HTTP port (overrides PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Optional TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the current observation for one city and print it
    Now { city: String },
    /// Print the supported regions
    Regions,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { LogLevel::Debug } else { LogLevel::Info });

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let nowcaster = Nowcaster::new(config);

    match cli.command {
        Some(Command::Now { city }) => print_json(&nowcaster.get_now_weather(&city)),
        Some(Command::Regions) => print_json(&nowcaster.list_supported_regions()),
        None => run_server(nowcaster, cli.http_stream),
    }
}

/// The one-shot subcommands stay off the runtime; serving needs it.
fn run_server(nowcaster: Nowcaster, http_stream: bool) -> anyhow::Result<()> {
    let server_config = nowcaster.config().server.clone();
    let nowcaster = Arc::new(nowcaster);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    if http_stream {
        runtime.block_on(server::http::serve(nowcaster, &server_config))
    } else {
        runtime.block_on(server::stdio::serve(NowcastMcpServer::new(nowcaster)))
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize result")?;
    println!("{}", text);
    Ok(())
}
