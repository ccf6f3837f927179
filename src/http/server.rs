use std::{future::Future, io, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};
use super::handler::handle_client;
use crate::config::registry::Registry;

pub async fn run<F>(
    address: &str,
    registry: Arc<Registry>,
    cors: bool,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()>,
{
    let listener = TcpListener::bind(address).await?;
    info!("Server listening on {}", listener.local_addr()?);
    serve(listener, registry, cors, shutdown).await?;
    Ok(())
}

/// Accepts connections on an already bound listener until `shutdown`
/// resolves. Each connection is handled on its own task.
pub async fn serve<F>(
    listener: TcpListener,
    registry: Arc<Registry>,
    cors: bool,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down server");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        continue;
                    }
                };
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, peer, registry, cors).await {
                        error!("Error handling client: {}", e);
                    }
                });
            }
        }
    }
}
