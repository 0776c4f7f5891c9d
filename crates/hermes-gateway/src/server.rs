//! HTTP/1.1 serving on hyper.
//!
//! ```text
//!   accept ──► connection task ──► collect body (size-limited)
//!                                        │
//!                                        ▼
//!                             Gateway::handle_cancellable
//! ```
//!
//! Each connection runs on its own task. When the shutdown signal fires the
//! accept loop stops, open connections are asked to finish their current
//! request, and the server waits up to the configured shutdown timeout for
//! them to close.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hermes_bind::BindError;
use hermes_core::CancellationToken;
use hermes_middleware::Response;
use http::header::CONTENT_LENGTH;
use http::HeaderMap;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::error::{DispatchError, GatewayError};
use crate::gateway::Gateway;
use crate::responder::Responder;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

impl Gateway {
    /// Serves on `addr` until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Fails if `addr` does not parse or cannot be bound.
    pub async fn serve(self, addr: &str) -> Result<(), GatewayError> {
        let socket: SocketAddr = addr
            .parse()
            .map_err(|_| GatewayError::InvalidAddress(addr.to_string()))?;
        let listener = TcpListener::bind(socket).await?;
        self.serve_with_shutdown(listener, ShutdownSignal::with_os_signals())
            .await
    }

    /// Serves connections from `listener` until `shutdown` fires, then
    /// drains open connections.
    ///
    /// Registration is closed from this point on.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), GatewayError> {
        self.seal();
        let local_addr = listener.local_addr()?;
        tracing::info!(
            service = %self.name(),
            addr = %local_addr,
            endpoints = self.registry().len(),
            middleware = ?self.chain().names(),
            "gateway listening"
        );

        let gateway = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let connection = tracker.acquire();
                        let gateway = Arc::clone(&gateway);
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            serve_connection(gateway, stream, remote, shutdown).await;
                            drop(connection);
                        });
                    }
                    Err(err) => tracing::warn!(error = %err, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!(service = %gateway.name(), "shutdown requested, no longer accepting");
                    break;
                }
            }
        }

        let grace = gateway.config().shutdown_timeout();
        tracing::info!(
            open = tracker.active_connections(),
            grace = ?grace,
            "waiting for connections to close"
        );
        if tokio::time::timeout(grace, tracker.drained()).await.is_err() {
            tracing::warn!(
                open = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        tracing::info!(service = %gateway.name(), "gateway stopped");
        Ok(())
    }

    async fn serve_request(&self, request: http::Request<Incoming>) -> Response {
        // Cancelled if hyper drops this future because the client went away.
        let token = CancellationToken::new();
        let _disconnect = token.clone().drop_guard();

        let (parts, body) = request.into_parts();
        let limit = self.config().max_body_bytes();

        let body = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                let err = if err.downcast_ref::<LengthLimitError>().is_some() {
                    let declared =
                        declared_length(&parts.headers).unwrap_or(limit.saturating_add(1));
                    DispatchError::Bind(BindError::payload_too_large(limit, declared))
                } else {
                    DispatchError::BodyRead(err.to_string())
                };
                tracing::debug!(
                    http.method = %parts.method,
                    http.path = %parts.uri.path(),
                    error = %err,
                    "request body rejected"
                );
                return Responder::failure(&err);
            }
        };

        let request = http::Request::from_parts(parts, Full::new(body));
        self.handle_cancellable(request, token).await
    }
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

async fn serve_connection(
    gateway: Arc<Gateway>,
    stream: TcpStream,
    remote: SocketAddr,
    shutdown: ShutdownSignal,
) {
    let service = service_fn(move |request: http::Request<Incoming>| {
        let gateway = Arc::clone(&gateway);
        async move { Ok::<_, Infallible>(gateway.serve_request(request).await) }
    });

    let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let result = tokio::select! {
        result = connection.as_mut() => result,
        () = shutdown.recv() => {
            connection.as_mut().graceful_shutdown();
            connection.await
        }
    };

    // The peer may already be gone; nothing is retried.
    if let Err(err) = result {
        tracing::debug!(%remote, error = %err, "connection closed with error");
    }
}
