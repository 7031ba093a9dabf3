//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use postback_receiver::config::ReceiverConfig;
use postback_receiver::http::HttpServer;
use postback_receiver::lifecycle::Shutdown;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A receiver running on an ephemeral port with its own log directory.
pub struct TestReceiver {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub log_dir: PathBuf,
    _tmp: TempDir,
}

impl TestReceiver {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// Every persisted line across all daily files.
    #[allow(dead_code)]
    pub fn persisted_lines(&self) -> Vec<String> {
        read_lines(&self.log_dir)
    }
}

impl Drop for TestReceiver {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a receiver with defaults apart from the listener and log directory.
#[allow(dead_code)]
pub async fn start_receiver() -> TestReceiver {
    start_receiver_with(|_| {}).await
}

#[allow(dead_code)]
pub async fn start_receiver_with<F>(customize: F) -> TestReceiver
where
    F: FnOnce(&mut ReceiverConfig),
{
    let tmp = tempfile::tempdir().unwrap();
    let log_dir = tmp.path().join("response_logs");

    let mut config = ReceiverConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.persistence.log_dir = log_dir.to_string_lossy().into_owned();
    customize(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestReceiver {
        addr,
        shutdown,
        log_dir,
        _tmp: tmp,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn read_lines(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
    files.sort();

    files
        .iter()
        .flat_map(|path| {
            std::fs::read_to_string(path)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
