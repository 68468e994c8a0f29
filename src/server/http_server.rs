//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use log::{debug, error, info, warn};

use crate::parser::parse_request;
use crate::routing::Router;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

/// An HTTP server serving a frozen [`Router`].
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The routes and middleware, shared read-only between connections.
    pub router: Arc<Router>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and router.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    /// Log the registered endpoints.
    fn display_server_info(&self) {
        info!("Registered endpoints:");
        for route in self.router.routes().iter() {
            info!("  {method} {pattern}", method = route.method, pattern = route.pattern.as_str());
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!(
            "HTTP listening on http://{host}:{port}",
            host = self.config.host,
            port = self.config.port
        );
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown_tx: Arc<mpsc::Sender<()>>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Hand an accepted connection to its own task, or turn it away with a
    /// 503 when the connection limit is reached.
    async fn handle_new_connection(
        mut socket: TcpStream,
        addr: SocketAddr,
        semaphore: Arc<Semaphore>,
        router: Arc<Router>,
        read_buffer_size: usize,
        tasks: &mut JoinSet<()>,
    ) {
        let permit = match semaphore.try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                let response = HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE)
                    .with_content_type("text/plain")
                    .with_body_string("Server is at capacity, please try again later");
                let _ = socket.write_all(&response.to_bytes()).await;
                return;
            }
        };

        tasks.spawn(async move {
            // Held until the connection is done
            let _permit = permit;

            debug!("Accepted connection from {addr}");
            if let Err(e) = Self::handle_connection(&mut socket, &router, read_buffer_size).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Returns true when the accept error is fatal.
    async fn handle_accept_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // Transient errors (e.g. EMFILE) back off briefly
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        false
    }

    /// Wait for in-flight connections, up to 30 seconds.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        info!("Server shutdown complete");
    }

    /// Start the server and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        self.display_server_info();

        let listener = self.setup_listener().await?;
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        // The sender is kept here so the channel stays open if the Ctrl+C hook fails
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let shutdown_tx = Arc::new(shutdown_tx);

        let mut tasks = JoinSet::new();
        Self::setup_ctrl_c_handler(shutdown_tx.clone(), &mut tasks);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                semaphore.clone(),
                                self.router.clone(),
                                self.config.read_buffer_size,
                                &mut tasks,
                            ).await;
                        }
                        Err(e) => {
                            if Self::handle_accept_error(e).await {
                                break;
                            }
                        }
                    }
                }

                // Reap finished connections so the set does not grow unbounded
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Serve a single request on `socket`.
    ///
    /// Unmatched routes, middleware rejections and handler failures are all
    /// answered with a response and return `Ok`. Only unparseable requests
    /// and socket errors are reported as errors.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        router: &Router,
        read_buffer_size: usize,
    ) -> Result<(), Error> {
        let mut buf = vec![0; read_buffer_size];
        let mut filled = 0;

        // The head may arrive over several reads
        while filled < buf.len() {
            let n = socket.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
            if head_complete(&buf[..filled]) {
                break;
            }
        }

        if filled == 0 {
            return Ok(()); // Connection closed
        }

        let request = match parse_request(&buf[..filled]) {
            Ok(req) => req,
            Err(e) => {
                let response = HttpResponse::new(StatusCode::BAD_REQUEST)
                    .with_content_type("text/plain")
                    .with_body_string(format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::ParseError(e));
            }
        };

        let response = router.dispatch(request).await;
        socket.write_all(&response.to_bytes()).await?;
        socket.flush().await?;

        Ok(())
    }
}

/// Whether `buf` holds a full request head, i.e. ends its headers with a
/// blank line.
fn head_complete(buf: &[u8]) -> bool {
    buf.windows(4).any(|window| window == b"\r\n\r\n") || buf.windows(2).any(|window| window == b"\n\n")
}
