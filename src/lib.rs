//! # hdfs-gateway
//!
//! Thin HTTP gateway forwarding directory and file operations to a
//! distributed filesystem. The gateway holds no state of its own: every
//! request acquires a fresh client handle, performs one operation (or a
//! short fixed sequence, e.g. existence-check-then-copy), and releases the
//! handle on the way out.
//!
//! ## Features
//!
//! - **Directory operations**: create (`/mkdir`), recursive delete
//!   (`/rmdir`), existence check with optional create (`/isexist`).
//! - **File operations**: create with inline content (`/createFile`),
//!   rename (`/rename`).
//! - **Transfers**: bulk and streaming upload (`/up`, `/bigUp`) and
//!   download (`/down`, `/bigDown`) between local disk and the remote
//!   filesystem, with base-name resolution and overwrite guards.
//! - **Introspection**: shallow (`/pathFiles`) and recursive
//!   (`/RPathFiles`) listings, block locations (`/fileBlock`), cluster
//!   node status (`/dataNodeInfo`).
//!
//! The remote filesystem is reached through the [`client::DfsClient`]
//! capability. [`WebHdfsConnector`] speaks WebHDFS against an HDFS
//! NameNode; [`MemoryConnector`] keeps a tree in process for tests and
//! embedded use.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hdfs_gateway::{GatewayConfig, WebHdfsConnector, serve};
//!
//! # async fn example() -> hdfs_gateway::Result<()> {
//! let connector = WebHdfsConnector::new("http://namenode:9870", Some("hdfs".into()))?;
//! let config = GatewayConfig {
//!     base_uri: "hdfs://namenode:8020".into(),
//!     ..GatewayConfig::default()
//! };
//! serve(config, Arc::new(connector)).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;

// Re-export commonly used types
pub use client::{
    BlockLocation, ClusterAdmin, DatanodeStatus, DfsClient, DfsConnector, FileStatus,
    MemoryConnector, NodeState, WebHdfsConnector,
};
pub use config::{ErrorSurface, GatewayConfig};
pub use error::{GatewayError, Result};
pub use gateway::Gateway;
pub use server::{router, serve};
