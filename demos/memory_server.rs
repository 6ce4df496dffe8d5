//! Run the gateway against the in-process memory backend.
//!
//! Useful for poking at the HTTP surface without an HDFS cluster:
//!
//! ```sh
//! cargo run --example memory_server
//! curl -X POST -d 'paths=/a/b' http://127.0.0.1:8080/mkdir
//! curl -X POST -d 'paths=/a/b' http://127.0.0.1:8080/isexist
//! ```

use std::sync::Arc;

use hdfs_gateway::{GatewayConfig, MemoryConnector, serve};

#[tokio::main]
async fn main() -> hdfs_gateway::Result<()> {
    tracing_subscriber::fmt().init();

    let config = GatewayConfig {
        bind_addr: ([127, 0, 0, 1], 8080).into(),
        ..GatewayConfig::default()
    };
    serve(config, Arc::new(MemoryConnector::new())).await
}
