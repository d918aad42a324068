use std::time::Duration;

use common::{log, log_warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A hosted game's connection plus the task that turns away later arrivals.
/// The gatekeeper runs until it is aborted.
pub struct HostedPeer {
    pub stream: TcpStream,
    pub gatekeeper: JoinHandle<()>,
}

pub async fn bind_host(port: u16) -> Result<TcpListener, String> {
    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| format!("Failed to listen on {}: {}", address, e))?;
    log!("Hosting on {}, waiting for an opponent", address);
    Ok(listener)
}

/// Accepts exactly one opponent. Anyone connecting afterwards is closed
/// straight away.
pub async fn accept_one(listener: TcpListener) -> Result<HostedPeer, String> {
    let (stream, addr) = listener
        .accept()
        .await
        .map_err(|e| format!("Failed to accept opponent: {}", e))?;
    log!("Opponent connected from {}", addr);

    let gatekeeper = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((extra, addr)) => {
                    log!("Turning away {}: game already has two players", addr);
                    drop(extra);
                }
                Err(e) => {
                    log_warn!("Stopped accepting connections: {}", e);
                    break;
                }
            }
        }
    });

    Ok(HostedPeer { stream, gatekeeper })
}

pub async fn connect(address: &str, timeout: Duration) -> Result<TcpStream, String> {
    match tokio::time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => {
            log!("Connected to {}", address);
            Ok(stream)
        }
        Ok(Err(e)) => Err(format!("Failed to connect to {}: {}", address, e)),
        Err(_) => Err(format!("Timed out connecting to {} after {:?}", address, timeout)),
    }
}
