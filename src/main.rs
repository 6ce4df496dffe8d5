use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use hdfs_gateway::{ErrorSurface, GatewayConfig, WebHdfsConnector, serve};

/// HTTP gateway to an HDFS cluster over WebHDFS.
#[derive(Parser, Debug)]
#[command(name = "hdfs-gateway", version, about)]
struct Args {
    /// Address the HTTP server binds to.
    #[arg(long, env = "HDFS_GATEWAY_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// NameNode HTTP endpoint (WebHDFS).
    #[arg(long, env = "HDFS_GATEWAY_NAMENODE", default_value = "http://localhost:9870")]
    namenode: String,

    /// Base URI prepended to every caller path; empty passes paths through.
    #[arg(long, env = "HDFS_GATEWAY_BASE_URI", default_value = "")]
    base_uri: String,

    /// User name sent as `user.name` with every WebHDFS request.
    #[arg(long, env = "HDFS_GATEWAY_USER")]
    user: Option<String>,

    /// Fault surfacing: `legacy` (always 200, inspect payload) or `strict`.
    #[arg(long, env = "HDFS_GATEWAY_ERRORS", default_value = "legacy")]
    errors: ErrorSurface,

    /// Refuse caller paths containing `.` or `..` segments.
    #[arg(long, env = "HDFS_GATEWAY_REJECT_DOT_SEGMENTS")]
    reject_dot_segments: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = Args::parse();

    let connector = match WebHdfsConnector::new(&args.namenode, args.user.take()) {
        Ok(connector) => connector,
        Err(err) => {
            error!(error = %err, namenode = %args.namenode, "invalid NameNode endpoint");
            std::process::exit(1);
        }
    };

    let config = GatewayConfig {
        bind_addr: args.bind,
        base_uri: args.base_uri,
        error_surface: args.errors,
        reject_dot_segments: args.reject_dot_segments,
    };

    if let Err(err) = serve(config, Arc::new(connector)).await {
        error!(error = %err, "gateway exited with error");
        std::process::exit(1);
    }
}
