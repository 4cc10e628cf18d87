use std::net::SocketAddr;
use std::sync::Arc;

use contacts_config::ServerConfig;
use contacts_store::RecordStore;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::{router, AppState};
use crate::error::ServerError;

/// Bind `config.address()` and serve in a background task.
///
/// Returns the bound address (useful with port 0) and the server task; abort
/// the task to shut down.
///
/// ```no_run
/// use std::sync::Arc;
/// use contacts_config::ServerConfig;
/// use contacts_server::start_server;
/// use contacts_store::InMemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (addr, handle) = start_server(&ServerConfig::default(), Arc::new(InMemoryStore::new())).await?;
/// println!("listening on {addr}");
/// handle.abort();
/// # Ok(())
/// # }
/// ```
pub async fn start_server(
    config: &ServerConfig,
    store: Arc<dyn RecordStore>,
) -> Result<(SocketAddr, JoinHandle<()>), ServerError> {
    let address = config.address();
    let bind_error = |source| ServerError::Bind {
        address: address.clone(),
        source,
    };
    let listener = TcpListener::bind(&address).await.map_err(bind_error)?;
    let local = listener.local_addr().map_err(bind_error)?;

    let app = router(AppState::new(store), config);
    tracing::info!(
        "contacts server listening on http://{local} (static root {})",
        config.static_dir.display()
    );

    let server_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("contacts server error: {e}");
        }
        tracing::info!("contacts server task exiting");
    });

    Ok((local, server_task))
}
