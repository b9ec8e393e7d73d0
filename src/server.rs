use crate::agent::ConciergeAgent;
use crate::websocket::handle_connection;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use log::{ info, error };

pub struct Server {
    addr: String,
    agent: Arc<ConciergeAgent>,
}

impl Server {
    pub fn new(addr: String, agent: Arc<ConciergeAgent>) -> Self {
        Self { addr, agent }
    }

    /// Accepts connections forever; every connection gets its own session.
    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!("WS server listening on: {}", self.addr);

        loop {
            let (stream, peer) = listener.accept().await?;
            info!("Incoming connection from: {}", peer);
            let agent = Arc::clone(&self.agent);

            tokio::spawn(async move {
                match accept_async(stream).await {
                    Ok(ws) => handle_connection(peer, ws, agent).await,
                    Err(e) => error!("Handshake failed for {}: {}", peer, e),
                }
            });
        }
    }
}
