use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, trace};

use d3_pipeline::config::{Config, ConfigLoader};
use d3_pipeline::framework::Framework;
use d3_pipeline::greeter::{GreeterData, GreeterDelivery, GreeterDisplay, GreeterInput, GreeterOutput};
use d3_pipeline::server::Server;

/// Serve one request pipeline over HTTP, TCP and WebSocket
#[derive(Parser)]
#[command(name = "d3")]
#[command(about = "Transport-agnostic Input/Data/Delivery/Output pipeline", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start every enabled transport (default command)
    Serve {
        /// Address for the HTTP listener
        #[arg(long)]
        http_addr: Option<String>,

        /// Address for the TCP listener
        #[arg(long)]
        tcp_addr: Option<String>,

        /// Address for the WebSocket listener
        #[arg(long)]
        ws_addr: Option<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ConfigLoader::load(cli.config.as_deref()).await?;

    let log_level = match cli.verbose {
        0 => config.get_log_level().to_string(),
        1 => "debug".to_string(),
        2 => "trace".to_string(),
        _ => "trace,hyper=debug,tower=debug".to_string(), // -vvv shows everything including dependencies
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("d3 started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    match cli.command.unwrap_or(Commands::Serve {
        http_addr: None,
        tcp_addr: None,
        ws_addr: None,
    }) {
        Commands::Serve {
            http_addr,
            tcp_addr,
            ws_addr,
        } => {
            if let Some(addr) = http_addr {
                config.http.addr = addr;
            }
            if let Some(addr) = tcp_addr {
                config.tcp.addr = addr;
            }
            if let Some(addr) = ws_addr {
                config.websocket.addr = addr;
            }
            config.validate()?;
            serve(config).await
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let framework = Framework::builder()
        .input(GreeterInput::new(config.tcp.read_buffer))
        .data(GreeterData)
        .delivery(GreeterDelivery)
        .output(GreeterOutput)
        .display(GreeterDisplay)
        .build();

    let server = Server::new(Arc::new(framework), config);

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
            Ok(())
        }
    }
}
