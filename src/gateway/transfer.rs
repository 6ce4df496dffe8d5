//! Upload and download operations.
//!
//! Small-file variants move the whole payload in one call; large-file
//! variants stream through the client's fixed-size buffer and never
//! overwrite. Both tiers share the same base-name resolution: a transfer
//! target names a directory, and the source file's base name is appended
//! unless the directory already ends in a separator.

use tokio::fs::File;
use tokio::io::BufWriter;
use tracing::debug;

use super::Gateway;
use super::path::{base_name, join_target};
use crate::error::{GatewayError, Result};

impl Gateway {
    /// Upload a local file in one bulk write. With `overwrite` unset, an
    /// existing target aborts the operation before the source is touched.
    /// `del_src` removes the local source after a successful copy.
    pub async fn upload(
        &self,
        local_path: &str,
        hdfs_path: &str,
        del_src: bool,
        overwrite: bool,
    ) -> Result<String> {
        let dir = self.resolve(hdfs_path)?;
        let target = join_target(&dir, base_name(local_path));
        let fs = self.fs().await?;
        if !overwrite && fs.exists(&target).await? {
            return Err(GatewayError::AlreadyExists(target));
        }
        let data = tokio::fs::read(local_path).await?;
        let bytes = data.len();
        fs.write(&target, data, overwrite).await?;
        if del_src {
            tokio::fs::remove_file(local_path).await?;
        }
        debug!(target = %target, bytes, "upload complete");
        Ok(target)
    }

    /// Upload a local file through the streaming path. Always aborts on an
    /// existing target.
    pub async fn upload_streaming(&self, local_path: &str, hdfs_path: &str) -> Result<String> {
        let dir = self.resolve(hdfs_path)?;
        let target = join_target(&dir, base_name(local_path));
        let fs = self.fs().await?;
        if fs.exists(&target).await? {
            return Err(GatewayError::AlreadyExists(target));
        }
        let source = File::open(local_path).await?;
        let bytes = fs.write_from(&target, Box::new(source)).await?;
        debug!(target = %target, bytes, "streaming upload complete");
        Ok(target)
    }

    /// Download a remote file in one bulk read. The remote source must
    /// exist or the operation aborts early. `del_src` removes the remote
    /// source after a successful copy. `raw_local` mirrors the original
    /// raw-local-filesystem toggle; local writes here never produce a
    /// checksum sidecar, so it has no effect.
    pub async fn download(
        &self,
        local_path: &str,
        hdfs_path: &str,
        del_src: bool,
        raw_local: bool,
    ) -> Result<String> {
        let _ = raw_local;
        let source = self.resolve(hdfs_path)?;
        let fs = self.fs().await?;
        if !fs.exists(&source).await? {
            return Err(GatewayError::NotFound(source));
        }
        let target = join_target(local_path, base_name(&source));
        let data = fs.read(&source).await?;
        tokio::fs::write(&target, &data).await?;
        if del_src {
            fs.delete(&source, false).await?;
        }
        debug!(source = %source, target = %target, bytes = data.len(), "download complete");
        Ok(target)
    }

    /// Download a remote file through the streaming path.
    pub async fn download_streaming(&self, local_path: &str, hdfs_path: &str) -> Result<String> {
        let source = self.resolve(hdfs_path)?;
        let fs = self.fs().await?;
        if !fs.exists(&source).await? {
            return Err(GatewayError::NotFound(source));
        }
        let target = join_target(local_path, base_name(&source));
        let mut writer = BufWriter::new(File::create(&target).await?);
        let bytes = fs.read_into(&source, &mut writer).await?;
        debug!(source = %source, target = %target, bytes, "streaming download complete");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::client::{DfsConnector, MemoryConnector};
    use crate::config::GatewayConfig;
    use crate::error::GatewayError;
    use crate::gateway::Gateway;

    fn gateway() -> (Gateway, MemoryConnector) {
        let connector = MemoryConnector::new();
        (
            Gateway::new(GatewayConfig::default(), Arc::new(connector.clone())),
            connector,
        )
    }

    #[tokio::test]
    async fn upload_appends_base_name() {
        let (gw, connector) = gateway();
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("report.csv");
        std::fs::write(&local, b"rows").unwrap();

        let target = gw
            .upload(local.to_str().unwrap(), "/in", false, false)
            .await
            .unwrap();
        assert_eq!(target, "/in/report.csv");
        let fs = connector.connect().await.unwrap();
        assert_eq!(fs.read("/in/report.csv").await.unwrap(), b"rows");
        assert!(local.exists());
    }

    #[tokio::test]
    async fn upload_without_overwrite_leaves_target_untouched() {
        let (gw, connector) = gateway();
        let fs = connector.connect().await.unwrap();
        fs.write("/in/report.csv", b"original".to_vec(), false)
            .await
            .unwrap();

        let dir = TempDir::new().unwrap();
        let local = dir.path().join("report.csv");
        std::fs::write(&local, b"replacement").unwrap();

        let err = gw
            .upload(local.to_str().unwrap(), "/in", false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::AlreadyExists(_)));
        assert_eq!(fs.read("/in/report.csv").await.unwrap(), b"original");
        assert!(local.exists());
    }

    #[tokio::test]
    async fn upload_with_overwrite_replaces() {
        let (gw, connector) = gateway();
        let fs = connector.connect().await.unwrap();
        fs.write("/in/f", b"old".to_vec(), false).await.unwrap();

        let dir = TempDir::new().unwrap();
        let local = dir.path().join("f");
        std::fs::write(&local, b"new").unwrap();

        gw.upload(local.to_str().unwrap(), "/in", false, true)
            .await
            .unwrap();
        assert_eq!(fs.read("/in/f").await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn upload_del_src_removes_local() {
        let (gw, _) = gateway();
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("gone.bin");
        std::fs::write(&local, b"x").unwrap();

        gw.upload(local.to_str().unwrap(), "/in", true, false)
            .await
            .unwrap();
        assert!(!local.exists());
    }

    #[tokio::test]
    async fn download_missing_source_aborts_early() {
        let (gw, _) = gateway();
        let dir = TempDir::new().unwrap();
        let err = gw
            .download(dir.path().to_str().unwrap(), "/absent.bin", false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn download_del_src_removes_remote() {
        let (gw, connector) = gateway();
        let fs = connector.connect().await.unwrap();
        fs.write("/out/f.bin", b"data".to_vec(), false).await.unwrap();

        let dir = TempDir::new().unwrap();
        gw.download(dir.path().to_str().unwrap(), "/out/f.bin", true, false)
            .await
            .unwrap();
        assert!(!fs.exists("/out/f.bin").await.unwrap());
    }

    #[tokio::test]
    async fn round_trip_is_byte_identical() {
        let (gw, _) = gateway();
        let dir = TempDir::new().unwrap();
        let payload: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
        let local = dir.path().join("blob.bin");
        std::fs::write(&local, &payload).unwrap();

        gw.upload(local.to_str().unwrap(), "/store", false, false)
            .await
            .unwrap();
        let fetched_dir = TempDir::new().unwrap();
        let fetched = gw
            .download(
                fetched_dir.path().to_str().unwrap(),
                "/store/blob.bin",
                false,
                false,
            )
            .await
            .unwrap();
        assert_eq!(std::fs::read(fetched).unwrap(), payload);
    }

    #[tokio::test]
    async fn streaming_round_trip_is_byte_identical() {
        let (gw, _) = gateway();
        let dir = TempDir::new().unwrap();
        // Larger than the 2048-byte copy buffer, not a multiple of it.
        let payload = vec![0xabu8; 7_001];
        let local = dir.path().join("big.bin");
        std::fs::write(&local, &payload).unwrap();

        gw.upload_streaming(local.to_str().unwrap(), "/big")
            .await
            .unwrap();
        let fetched_dir = TempDir::new().unwrap();
        let fetched = gw
            .download_streaming(fetched_dir.path().to_str().unwrap(), "/big/big.bin")
            .await
            .unwrap();
        assert_eq!(std::fs::read(fetched).unwrap(), payload);
    }

    #[tokio::test]
    async fn streaming_upload_refuses_existing_target() {
        let (gw, connector) = gateway();
        let fs = connector.connect().await.unwrap();
        fs.write("/big/big.bin", b"kept".to_vec(), false).await.unwrap();

        let dir = TempDir::new().unwrap();
        let local = dir.path().join("big.bin");
        std::fs::write(&local, b"other").unwrap();

        let err = gw
            .upload_streaming(local.to_str().unwrap(), "/big")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::AlreadyExists(_)));
        assert_eq!(fs.read("/big/big.bin").await.unwrap(), b"kept");
    }

    #[tokio::test]
    async fn trailing_separator_skips_extra_slash() {
        let (gw, connector) = gateway();
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("f.txt");
        std::fs::write(&local, b"x").unwrap();

        let target = gw
            .upload(local.to_str().unwrap(), "/in/", false, false)
            .await
            .unwrap();
        assert_eq!(target, "/in/f.txt");
        let fs = connector.connect().await.unwrap();
        assert!(fs.exists("/in/f.txt").await.unwrap());
    }
}
