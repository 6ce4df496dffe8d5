//! File content operations.

use tracing::debug;

use super::Gateway;
use crate::error::Result;

impl Gateway {
    /// Write a byte payload to a new file, overwriting any existing file at
    /// the path. Content is flushed before the handle is released.
    pub async fn create_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let resolved = self.resolve(path)?;
        let fs = self.fs().await?;
        fs.write(&resolved, contents.to_vec(), true).await?;
        debug!(path = %resolved, bytes = contents.len(), "file created");
        Ok(())
    }

    /// Move/rename a path. `Ok(false)` when the remote filesystem refuses,
    /// for instance on a nonexistent source.
    pub async fn rename(&self, oldname: &str, newname: &str) -> Result<bool> {
        let old = self.resolve(oldname)?;
        let new = self.resolve(newname)?;
        let fs = self.fs().await?;
        fs.rename(&old, &new).await
    }
}
