mod room_registry;
mod server_config;
mod tcp_handler;
mod web_server;
mod ws_handler;

use std::path::PathBuf;

use clap::Parser;
use common::config::Validate;
use common::{log, log_warn, logger};
use tokio::net::TcpListener;

use room_registry::RoomRegistry;
use server_config::get_config_manager;
use tcp_handler::run_tcp_listener;
use web_server::{WebServerState, run_web_server};

#[derive(Parser)]
#[command(name = "tictactoe_relay")]
struct Args {
    #[arg(long)]
    use_log_prefix: bool,

    /// Path to the YAML config; defaults to a file next to the executable
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    tcp_address: Option<String>,

    #[arg(long)]
    web_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Relay".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = get_config_manager(args.config.as_deref()).get_config()?;
    if let Some(tcp_address) = args.tcp_address {
        config.tcp_address = tcp_address;
    }
    if let Some(web_address) = args.web_address {
        config.web_address = web_address;
    }
    config.validate()?;

    let registry = RoomRegistry::new(config.max_rooms);

    let tcp_listener = TcpListener::bind(&config.tcp_address).await?;
    log!("TCP relay listening on {}", tcp_listener.local_addr()?);
    let web_listener = TcpListener::bind(&config.web_address).await?;

    let web_state = WebServerState {
        registry: registry.clone(),
        max_line_bytes: config.max_line_bytes,
    };

    tokio::select! {
        _ = run_tcp_listener(tcp_listener, registry, config.max_line_bytes) => {}
        result = run_web_server(web_listener, web_state) => {
            if let Err(e) = result {
                log_warn!("Web server stopped: {}", e);
            }
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            log!("Shutdown signal received");
        }
    }

    log!("Relay shut down");

    Ok(())
}
