//! Ctrl+C driven shutdown

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Token cancelled on the first Ctrl+C
pub fn shutdown_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, stopping");
                trigger.cancel();
            }
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    token
}
