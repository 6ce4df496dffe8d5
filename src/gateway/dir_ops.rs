//! Directory operations.

use tracing::debug;

use super::Gateway;
use crate::error::Result;

impl Gateway {
    /// Create a directory and any missing ancestors. Returns the resolved
    /// path for the caller-facing message.
    pub async fn mkdir(&self, path: &str) -> Result<String> {
        let resolved = self.resolve(path)?;
        let fs = self.fs().await?;
        fs.mkdirs(&resolved).await?;
        debug!(path = %resolved, "directory created");
        Ok(resolved)
    }

    /// Recursively delete a path. Destructive and irreversible at this
    /// layer. Returns the resolved path for the caller-facing message.
    pub async fn rmdir(&self, path: &str) -> Result<String> {
        let resolved = self.resolve(path)?;
        let fs = self.fs().await?;
        fs.delete(&resolved, true).await?;
        debug!(path = %resolved, "directory deleted");
        Ok(resolved)
    }

    /// Report whether a path is a directory, optionally creating it first.
    /// Empty input short-circuits to `false` without contacting the remote
    /// filesystem.
    pub async fn ensure_dir(&self, path: &str, create: bool) -> Result<bool> {
        if path.is_empty() {
            return Ok(false);
        }
        let resolved = self.resolve(path)?;
        let fs = self.fs().await?;
        if create && !fs.exists(&resolved).await? {
            fs.mkdirs(&resolved).await?;
        }
        Ok(fs
            .status(&resolved)
            .await?
            .map(|s| s.directory)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::client::MemoryConnector;
    use crate::config::GatewayConfig;
    use crate::gateway::Gateway;

    fn gateway(base_uri: &str) -> (Gateway, MemoryConnector) {
        let connector = MemoryConnector::new();
        let config = GatewayConfig {
            base_uri: base_uri.to_string(),
            ..GatewayConfig::default()
        };
        (
            Gateway::new(config, Arc::new(connector.clone())),
            connector,
        )
    }

    #[tokio::test]
    async fn mkdir_returns_qualified_path() {
        let (gw, _) = gateway("hdfs://node2:8020");
        let resolved = gw.mkdir("/a/b").await.unwrap();
        assert_eq!(resolved, "hdfs://node2:8020/a/b");
        assert!(gw.ensure_dir("/a/b", false).await.unwrap());
    }

    #[tokio::test]
    async fn ensure_dir_creates_when_asked() {
        let (gw, _) = gateway("");
        assert!(!gw.ensure_dir("/fresh", false).await.unwrap());
        assert!(gw.ensure_dir("/fresh", true).await.unwrap());
        assert!(gw.ensure_dir("/fresh", false).await.unwrap());
    }

    #[tokio::test]
    async fn ensure_dir_without_create_mutates_nothing() {
        let (gw, _) = gateway("");
        assert!(!gw.ensure_dir("/probe", false).await.unwrap());
        assert!(!gw.ensure_dir("/probe", false).await.unwrap());
    }

    #[tokio::test]
    async fn blank_path_short_circuits_without_connecting() {
        let (gw, connector) = gateway("");
        assert!(!gw.ensure_dir("", true).await.unwrap());
        assert_eq!(connector.connect_count(), 0);
    }

    #[tokio::test]
    async fn rmdir_removes_subtree() {
        let (gw, _) = gateway("");
        gw.mkdir("/a/b").await.unwrap();
        gw.rmdir("/a").await.unwrap();
        assert!(!gw.ensure_dir("/a/b", false).await.unwrap());
        assert!(!gw.ensure_dir("/a", false).await.unwrap());
    }

    #[tokio::test]
    async fn dot_segments_rejected_when_configured() {
        let connector = MemoryConnector::new();
        let config = GatewayConfig {
            reject_dot_segments: true,
            ..GatewayConfig::default()
        };
        let gw = Gateway::new(config, Arc::new(connector));
        assert!(gw.mkdir("/a/../b").await.is_err());
    }
}
