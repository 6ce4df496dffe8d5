//! Remote filesystem client capability.
//!
//! The gateway never talks to storage directly; every operation goes through
//! the [`DfsClient`] trait. The production implementation speaks WebHDFS
//! against the NameNode ([`WebHdfsConnector`]); an in-process tree
//! ([`MemoryConnector`]) backs the test suite and embedded use.
//!
//! A [`DfsConnector`] hands out one fresh client handle per request. The
//! handle is exclusively owned by the handling routine and released by drop
//! on every exit path.

pub mod memory;
pub mod types;
pub mod webhdfs;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;

pub use memory::MemoryConnector;
pub use types::{BlockLocation, DatanodeStatus, FileStatus, NodeState};
pub use webhdfs::WebHdfsConnector;

/// A reader streamed into the remote filesystem by [`DfsClient::write_from`].
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;

/// Per-request handle to the remote filesystem.
///
/// Paths are accepted in resolved form (possibly carrying a
/// `scheme://authority` prefix from the configured base URI); implementations
/// normalize them to their native form with [`native_path`].
#[async_trait]
pub trait DfsClient: Send + Sync {
    /// Create a directory and any missing ancestors. Idempotent.
    async fn mkdirs(&self, path: &str) -> Result<bool>;

    /// Delete a path, descending into directories when `recursive` is set.
    async fn delete(&self, path: &str, recursive: bool) -> Result<bool>;

    /// Move/rename a path. Returns `false` when the remote filesystem
    /// refuses (missing source, existing destination).
    async fn rename(&self, src: &str, dst: &str) -> Result<bool>;

    /// Look up the status of a path. `None` for a missing path, not a fault.
    async fn status(&self, path: &str) -> Result<Option<FileStatus>>;

    /// Whether a path exists.
    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.status(path).await?.is_some())
    }

    /// Write a full byte payload to a new file, flushing before return.
    async fn write(&self, path: &str, data: Vec<u8>, overwrite: bool) -> Result<()>;

    /// Stream a reader into a new file through a fixed-size buffer.
    /// Returns the number of bytes written. Never overwrites.
    async fn write_from(&self, path: &str, reader: BoxReader) -> Result<u64>;

    /// Read a full file into memory.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Stream a file into a writer chunk by chunk. Returns the number of
    /// bytes copied. The writer is flushed before return.
    async fn read_into(
        &self,
        path: &str,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64>;

    /// Immediate children of a directory.
    async fn list_status(&self, path: &str) -> Result<Vec<FileStatus>>;

    /// Storage-node locations covering `[offset, offset + length)` of a file.
    async fn block_locations(&self, path: &str, offset: u64, length: u64)
        -> Result<Vec<BlockLocation>>;

    /// Cluster introspection capability. `None` for clients that cannot
    /// report cluster state; callers must surface an unsupported result.
    fn cluster_admin(&self) -> Option<&dyn ClusterAdmin> {
        None
    }
}

/// Cluster introspection, implemented only by cluster-aware clients.
#[async_trait]
pub trait ClusterAdmin: Send + Sync {
    /// Live/dead status summaries for every storage node.
    async fn datanode_stats(&self) -> Result<Vec<DatanodeStatus>>;
}

/// Factory producing one [`DfsClient`] handle per request.
#[async_trait]
pub trait DfsConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn DfsClient>>;
}

/// Reduce a resolved path to the client-native absolute form: strip a
/// leading `scheme://authority` prefix and guarantee a leading slash.
pub(crate) fn native_path(resolved: &str) -> String {
    let rest = match resolved.find("://") {
        Some(idx) => {
            let after = &resolved[idx + 3..];
            match after.find('/') {
                Some(slash) => &after[slash..],
                None => "/",
            }
        }
        None => resolved,
    };
    if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    }
}
