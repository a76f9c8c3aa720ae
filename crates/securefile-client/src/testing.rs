//! In-process SecureFile server for tests
//!
//! Serves a router on an ephemeral loopback port and hands out clients that
//! talk to it. Each client has its own cookie jar, so two clients behave
//! like two separate browsers for the anti-forgery session.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{Result, UploadClient};

/// Loopback uploads never take this long unless the server is wedged
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// A running server, stopped when dropped
pub struct TestServer {
    addr: SocketAddr,
    /// Client sharing one session with the server for the life of the test
    pub client: UploadClient,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve `router` until dropped
    pub async fn start(router: axum::Router) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                tracing::warn!(error = %e, "Test server stopped with an error");
            }
        });

        let client = client_for(addr)?;
        tracing::debug!(%addr, "Test server listening");

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }

    /// A client with an empty cookie jar, i.e. a different browser
    pub fn fresh_client(&self) -> Result<UploadClient> {
        client_for(self.addr)
    }
}

fn client_for(addr: SocketAddr) -> Result<UploadClient> {
    UploadClient::with_config(&format!("http://{}", addr), UPLOAD_TIMEOUT, CONNECT_TIMEOUT)
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.handle.abort();
    }
}
