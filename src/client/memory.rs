//! In-process filesystem backend.
//!
//! Implements the full [`DfsClient`] contract over a tree held in memory.
//! Backs the test suite and embedded use; it deliberately does not implement
//! [`ClusterAdmin`](super::ClusterAdmin), which exercises the unsupported
//! path of the capability-gated node-info operation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::types::{BlockLocation, FileStatus};
use super::{BoxReader, DfsClient, DfsConnector, native_path};
use crate::error::{GatewayError, Result};

use super::webhdfs::COPY_BUF_SIZE;

#[derive(Debug, Clone)]
enum Entry {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct Tree {
    // Keyed by native absolute path; "/" is an implicit directory.
    entries: BTreeMap<String, Entry>,
}

static ROOT: Entry = Entry::Dir;

impl Tree {
    fn lookup(&self, path: &str) -> Option<&Entry> {
        if path == "/" {
            return Some(&ROOT);
        }
        self.entries.get(path)
    }

    fn mkdirs(&mut self, path: &str) {
        let mut partial = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            partial.push('/');
            partial.push_str(segment);
            self.entries
                .entry(partial.clone())
                .or_insert(Entry::Dir);
        }
    }

    fn children(&self, path: &str) -> Vec<String> {
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        self.entries
            .keys()
            .filter(|k| {
                k.starts_with(&prefix) && !k[prefix.len()..].contains('/')
            })
            .cloned()
            .collect()
    }

    fn has_children(&self, path: &str) -> bool {
        !self.children(path).is_empty()
    }

}

fn status_of(path: &str, entry: &Entry) -> FileStatus {
    FileStatus {
        path: path.to_string(),
        length: match entry {
            Entry::Dir => 0,
            Entry::File(data) => data.len() as u64,
        },
        directory: matches!(entry, Entry::Dir),
        modification_time: 0,
    }
}

/// Connector producing handles over one shared in-memory tree.
#[derive(Debug, Default, Clone)]
pub struct MemoryConnector {
    tree: Arc<Mutex<Tree>>,
    connects: Arc<AtomicUsize>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles handed out so far.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DfsConnector for MemoryConnector {
    async fn connect(&self) -> Result<Box<dyn DfsClient>> {
        self.connects.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(MemoryClient {
            tree: Arc::clone(&self.tree),
        }))
    }
}

/// Per-request handle over the shared tree.
pub struct MemoryClient {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryClient {
    fn with_tree<T>(&self, f: impl FnOnce(&mut Tree) -> T) -> T {
        let mut tree = self.tree.lock().expect("memory tree poisoned");
        f(&mut tree)
    }

    fn put_file(&self, path: &str, data: Vec<u8>, overwrite: bool) -> Result<()> {
        self.with_tree(|tree| {
            match tree.lookup(path) {
                Some(Entry::Dir) => return Err(GatewayError::NotAFile(path.to_string())),
                Some(Entry::File(_)) if !overwrite => {
                    return Err(GatewayError::AlreadyExists(path.to_string()));
                }
                _ => {}
            }
            if let Some(idx) = path.rfind('/') {
                if idx > 0 {
                    tree.mkdirs(&path[..idx]);
                }
            }
            tree.entries.insert(path.to_string(), Entry::File(data));
            Ok(())
        })
    }
}

#[async_trait]
impl DfsClient for MemoryClient {
    async fn mkdirs(&self, path: &str) -> Result<bool> {
        let path = native_path(path);
        self.with_tree(|tree| {
            if matches!(tree.lookup(&path), Some(Entry::File(_))) {
                return Err(GatewayError::NotAFile(path.clone()));
            }
            tree.mkdirs(&path);
            Ok(true)
        })
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<bool> {
        let path = native_path(path);
        self.with_tree(|tree| {
            if tree.lookup(&path).is_none() {
                return Ok(false);
            }
            if !recursive && tree.has_children(&path) {
                return Err(GatewayError::Remote {
                    exception: "PathIsNotEmptyDirectoryException".to_string(),
                    message: format!("`{path}' is non empty"),
                });
            }
            let prefix = format!("{path}/");
            tree.entries
                .retain(|k, _| k != &path && !k.starts_with(&prefix));
            Ok(true)
        })
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<bool> {
        let src = native_path(src);
        let dst = native_path(dst);
        self.with_tree(|tree| {
            if tree.lookup(&src).is_none() || tree.lookup(&dst).is_some() {
                return Ok(false);
            }
            let prefix = format!("{src}/");
            let moved: Vec<(String, Entry)> = tree
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() == src || k.starts_with(&prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            for (old, entry) in moved {
                tree.entries.remove(&old);
                let new = format!("{dst}{}", &old[src.len()..]);
                tree.entries.insert(new, entry);
            }
            Ok(true)
        })
    }

    async fn status(&self, path: &str) -> Result<Option<FileStatus>> {
        let path = native_path(path);
        self.with_tree(|tree| Ok(tree.lookup(&path).map(|entry| status_of(&path, entry))))
    }

    async fn write(&self, path: &str, data: Vec<u8>, overwrite: bool) -> Result<()> {
        self.put_file(&native_path(path), data, overwrite)
    }

    async fn write_from(&self, path: &str, mut reader: BoxReader) -> Result<u64> {
        let mut data = Vec::new();
        let mut buf = [0u8; COPY_BUF_SIZE];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
        }
        let written = data.len() as u64;
        self.put_file(&native_path(path), data, false)?;
        Ok(written)
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = native_path(path);
        self.with_tree(|tree| match tree.lookup(&path) {
            Some(Entry::File(data)) => Ok(data.clone()),
            Some(Entry::Dir) => Err(GatewayError::NotAFile(path.clone())),
            None => Err(GatewayError::NotFound(path.clone())),
        })
    }

    async fn read_into(
        &self,
        path: &str,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64> {
        let data = self.read(path).await?;
        for chunk in data.chunks(COPY_BUF_SIZE) {
            writer.write_all(chunk).await?;
        }
        writer.flush().await?;
        Ok(data.len() as u64)
    }

    async fn list_status(&self, path: &str) -> Result<Vec<FileStatus>> {
        let path = native_path(path);
        self.with_tree(|tree| match tree.lookup(&path) {
            Some(Entry::Dir) => Ok(tree
                .children(&path)
                .into_iter()
                .map(|child| {
                    let entry = tree.lookup(&child).cloned().unwrap_or(Entry::Dir);
                    status_of(&child, &entry)
                })
                .collect()),
            Some(entry @ Entry::File(_)) => Ok(vec![status_of(&path, entry)]),
            None => Err(GatewayError::NotFound(path.clone())),
        })
    }

    async fn block_locations(
        &self,
        path: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<BlockLocation>> {
        let status = self
            .status(path)
            .await?
            .ok_or_else(|| GatewayError::NotFound(native_path(path)))?;
        if status.directory {
            return Err(GatewayError::NotAFile(status.path));
        }
        if length == 0 || offset >= status.length {
            return Ok(Vec::new());
        }
        Ok(vec![BlockLocation {
            hosts: vec!["localhost".to_string()],
            names: vec!["localhost:9866".to_string()],
            topology_paths: vec!["/default-rack/localhost:9866".to_string()],
            offset: 0,
            length: status.length,
            corrupt: false,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mkdirs_creates_ancestors() {
        let connector = MemoryConnector::new();
        let fs = connector.connect().await.unwrap();
        assert!(fs.mkdirs("/a/b/c").await.unwrap());
        assert!(fs.status("/a").await.unwrap().unwrap().directory);
        assert!(fs.status("/a/b").await.unwrap().unwrap().directory);
    }

    #[tokio::test]
    async fn write_read_and_overwrite_guard() {
        let connector = MemoryConnector::new();
        let fs = connector.connect().await.unwrap();
        fs.write("/f.txt", b"one".to_vec(), false).await.unwrap();
        assert!(matches!(
            fs.write("/f.txt", b"two".to_vec(), false).await,
            Err(GatewayError::AlreadyExists(_))
        ));
        fs.write("/f.txt", b"two".to_vec(), true).await.unwrap();
        assert_eq!(fs.read("/f.txt").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn rename_moves_subtree() {
        let connector = MemoryConnector::new();
        let fs = connector.connect().await.unwrap();
        fs.mkdirs("/src/inner").await.unwrap();
        fs.write("/src/inner/f", b"x".to_vec(), false).await.unwrap();
        assert!(fs.rename("/src", "/dst").await.unwrap());
        assert!(fs.status("/src").await.unwrap().is_none());
        assert_eq!(fs.read("/dst/inner/f").await.unwrap(), b"x");
    }

    #[tokio::test]
    async fn rename_refuses_missing_or_occupied() {
        let connector = MemoryConnector::new();
        let fs = connector.connect().await.unwrap();
        fs.mkdirs("/there").await.unwrap();
        assert!(!fs.rename("/missing", "/other").await.unwrap());
        fs.mkdirs("/also-there").await.unwrap();
        assert!(!fs.rename("/there", "/also-there").await.unwrap());
    }

    #[tokio::test]
    async fn list_children_is_shallow() {
        let connector = MemoryConnector::new();
        let fs = connector.connect().await.unwrap();
        fs.mkdirs("/d/sub").await.unwrap();
        fs.write("/d/a", Vec::new(), false).await.unwrap();
        fs.write("/d/sub/deep", Vec::new(), false).await.unwrap();
        let names: Vec<String> = fs
            .list_status("/d")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.path)
            .collect();
        assert_eq!(names, vec!["/d/a".to_string(), "/d/sub".to_string()]);
    }

    #[tokio::test]
    async fn base_prefixed_paths_normalize() {
        let connector = MemoryConnector::new();
        let fs = connector.connect().await.unwrap();
        fs.mkdirs("hdfs://node2:8020/a/b").await.unwrap();
        assert!(fs.exists("/a/b").await.unwrap());
    }
}
