//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use planlegger_site::config::AppConfig;
use planlegger_site::http::HttpServer;
use planlegger_site::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Request lines seen by the mock analytics backend, e.g. `POST /e/?ip=1 HTTP/1.1`.
pub type Seen = Arc<Mutex<Vec<String>>>;

/// Start a mock analytics host that records request heads and returns a fixed body.
#[allow(dead_code)]
pub async fn start_analytics_backend(addr: SocketAddr, status: u16, response: &'static str) -> Seen {
    let listener = TcpListener::bind(addr).await.unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        recorded.lock().unwrap().push(head);

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    seen
}

/// Config pointing at `base_url`, forwarding analytics to `analytics_addr`.
pub fn test_config(site_addr: SocketAddr, analytics_addr: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = site_addr.to_string();
    config.site.base_url = "https://foreldrepenger.example.no".into();
    config.analytics.host = format!("http://{}", analytics_addr);
    config.analytics.key = "phc_integration".into();
    config
}

/// Running site server plus the handle needed to stop it.
pub struct RunningSite {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningSite {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the site on `config.listener.bind_address` and wait until it accepts.
pub async fn start_site(config: AppConfig) -> RunningSite {
    let addr: SocketAddr = config.listener.bind_address.parse().unwrap();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    tokio::time::sleep(Duration::from_millis(100)).await;

    RunningSite { addr, shutdown, handle }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
