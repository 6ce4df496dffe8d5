//! Listing and introspection operations.

use tracing::debug;

use super::Gateway;
use crate::client::{BlockLocation, DatanodeStatus};
use crate::error::{GatewayError, Result};

impl Gateway {
    /// Immediate children of a directory as qualified path strings. A
    /// missing or empty directory yields an empty list, not a fault.
    pub async fn list_children(&self, path: &str) -> Result<Vec<String>> {
        let resolved = self.resolve(path)?;
        let fs = self.fs().await?;
        match fs.list_status(&resolved).await {
            Ok(entries) => Ok(entries
                .into_iter()
                .map(|s| self.display_path(&s.path))
                .collect()),
            Err(GatewayError::NotFound(_)) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// Every file path under a directory, descending into all
    /// subdirectories. Directories themselves are not listed. The walk is
    /// materialized into one list before returning.
    pub async fn list_files_recursive(&self, path: &str) -> Result<Vec<String>> {
        let resolved = self.resolve(path)?;
        let fs = self.fs().await?;
        let mut files = Vec::new();
        let mut pending = vec![resolved];
        while let Some(dir) = pending.pop() {
            for status in fs.list_status(&dir).await? {
                if status.directory {
                    pending.push(status.path);
                } else {
                    files.push(self.display_path(&status.path));
                }
            }
        }
        debug!(count = files.len(), "recursive listing complete");
        Ok(files)
    }

    /// Storage-node locations covering the full byte range of a file. A
    /// zero-length file yields an empty list; a missing path or a directory
    /// is a fault.
    pub async fn file_blocks(&self, path: &str) -> Result<Vec<BlockLocation>> {
        let resolved = self.resolve(path)?;
        let fs = self.fs().await?;
        let status = fs
            .status(&resolved)
            .await?
            .ok_or_else(|| GatewayError::NotFound(resolved.clone()))?;
        if status.directory {
            return Err(GatewayError::NotAFile(resolved));
        }
        if status.length == 0 {
            return Ok(Vec::new());
        }
        fs.block_locations(&resolved, 0, status.length).await
    }

    /// Live/dead status of every storage node. Requires the connected
    /// client to expose the cluster-introspection capability.
    pub async fn datanode_info(&self) -> Result<Vec<DatanodeStatus>> {
        let fs = self.fs().await?;
        match fs.cluster_admin() {
            Some(admin) => admin.datanode_stats().await,
            None => Err(GatewayError::Unsupported),
        }
    }
}
