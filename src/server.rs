//! Static file server for the extension's manual test pages.

use crate::access_log::{self, AccessEntry};
use anyhow::{Context, Result};
use axum::{
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::{self, Next},
    response::Response,
    Router,
};
use log::debug;
use std::{
    future::Future,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

pub const DEFAULT_PORT: u16 = 9000;
/// Served directory, relative to the working directory.
pub const DEFAULT_ROOT: &str = "test-pages";
pub const TEST_PAGES: [&str; 3] = [
    "x402-test.html",
    "wallet-detection-test.html",
    "x402-payment-test.html",
];

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

/// Startup banner for a server listening on `port`.
pub fn banner_lines(port: u16) -> Vec<String> {
    let mut lines = vec![
        format!("X402 Test Server running at http://localhost:{port}"),
        "Test pages available:".to_string(),
    ];
    lines.extend(
        TEST_PAGES
            .iter()
            .map(|page| format!("- http://localhost:{port}/{page}")),
    );
    lines.push("Press Ctrl+C to stop the server".to_string());
    lines
}

/// Files under `root`, read-only, with one access line per request.
pub fn router(root: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(middleware::from_fn(log_requests))
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let target = request.uri().to_string();
    let version = format!("{:?}", request.version());

    let response = next.run(request).await;

    let size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());
    access_log::print(&AccessEntry {
        method,
        target,
        version,
        status: response.status().as_u16(),
        size,
    });
    response
}

/// A bound listener that has not started accepting connections yet.
pub struct TestServer {
    listener: TcpListener,
    root: PathBuf,
    addr: SocketAddr,
}

impl TestServer {
    /// Binds the listening socket. A relative root is resolved against the
    /// current working directory.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let root = if config.root.is_absolute() {
            config.root
        } else {
            std::env::current_dir()
                .context("Can't read the working directory")?
                .join(config.root)
        };

        let requested = SocketAddr::new(config.host, config.port);
        let listener = TcpListener::bind(requested)
            .await
            .with_context(|| format!("Can't bind {requested}"))?;
        let addr = listener.local_addr().unwrap_or(requested);
        debug!("Serving {} on {addr}", root.display());

        Ok(Self {
            listener,
            root,
            addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Accepts connections until `shutdown` resolves and in-flight requests
    /// finish. The listening socket is closed when this returns.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(&self.root);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server failed")
    }
}

/// Ctrl-C listener. The handler is registered on [`Interrupt::install`], so
/// an interrupt delivered before [`Interrupt::recv`] is polled is not lost.
pub struct Interrupt {
    #[cfg(unix)]
    signal: tokio::signal::unix::Signal,
    #[cfg(windows)]
    signal: tokio::signal::windows::CtrlC,
}

impl Interrupt {
    pub fn install() -> Result<Self> {
        #[cfg(unix)]
        let signal =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
                .context("Failed to install SIGINT handler")?;
        #[cfg(windows)]
        let signal = tokio::signal::windows::ctrl_c().context("Failed to install Ctrl+C handler")?;
        Ok(Self { signal })
    }

    pub async fn recv(mut self) {
        self.signal.recv().await;
    }
}
