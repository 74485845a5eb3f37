#![allow(dead_code)]

pub mod mock_proxima;

use std::time::Duration;

use proxima_client::{ClientConfig, ProximaClient};

/// Client config pointed at `base_url` with a short backoff
pub fn fast_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url)
        .unwrap()
        .with_backoff(Duration::from_millis(10))
}

/// Client over HTTP for `config`
pub fn client(config: ClientConfig) -> ProximaClient {
    ProximaClient::new(config).unwrap()
}

/// A local address nothing is listening on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
