use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use crate::api::{self, CallbackState};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Handle to the running callback listener.
pub struct CallbackServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<io::Result<()>>,
}

/// Binds `addr` and serves the callback route on `path` in a background task.
pub async fn start_callback_server(
    addr: SocketAddr,
    path: &str,
    state: Arc<CallbackState>,
) -> io::Result<CallbackServer> {
    let app = Router::new()
        .route(path, get(api::auth_callback))
        .layer(Extension(state));

    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    Ok(CallbackServer {
        local_addr,
        shutdown: Some(shutdown_tx),
        handle,
    })
}

impl CallbackServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits briefly for in-flight responses.
    pub async fn shutdown(mut self) -> io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut self.handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(io::Error::other(join_err)),
            Err(_) => {
                self.handle.abort();
                Ok(())
            }
        }
    }
}
