//! WebHDFS client speaking the NameNode REST protocol.
//!
//! Directory and metadata operations go straight to the NameNode. File
//! content operations (`CREATE`, `OPEN`) are two-step: the NameNode answers
//! with a 307 redirect naming the DataNode to talk to, so the HTTP client is
//! built with redirects disabled and follows the hop by hand.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::debug;
use url::Url;

use super::types::{BlockLocation, DatanodeStatus, FileStatus, NodeState};
use super::{BoxReader, ClusterAdmin, DfsClient, DfsConnector, native_path};
use crate::error::{GatewayError, Result};

/// Buffer size for streamed content transfers.
pub(crate) const COPY_BUF_SIZE: usize = 2048;

/// Connector producing WebHDFS-backed handles.
#[derive(Debug, Clone)]
pub struct WebHdfsConnector {
    endpoint: Url,
    user: Option<String>,
    http: Client,
}

impl WebHdfsConnector {
    /// Create a connector for a NameNode HTTP endpoint
    /// (e.g., `http://namenode:9870`).
    pub fn new(endpoint: &str, user: Option<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let http = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            endpoint,
            user,
            http,
        })
    }
}

#[async_trait]
impl DfsConnector for WebHdfsConnector {
    async fn connect(&self) -> Result<Box<dyn DfsClient>> {
        Ok(Box::new(WebHdfsClient {
            endpoint: self.endpoint.clone(),
            user: self.user.clone(),
            http: self.http.clone(),
        }))
    }
}

/// Per-request WebHDFS handle. Socket use goes through a shared pool;
/// everything request-scoped is owned here and released by drop.
pub struct WebHdfsClient {
    endpoint: Url,
    user: Option<String>,
    http: Client,
}

impl WebHdfsClient {
    fn op_url(&self, path: &str, op: &str) -> Url {
        let fs_path = native_path(path);
        let mut url = self.endpoint.clone();
        url.set_path(&format!("/webhdfs/v1{fs_path}"));
        url.query_pairs_mut().append_pair("op", op);
        if let Some(user) = &self.user {
            url.query_pairs_mut().append_pair("user.name", user);
        }
        url
    }

    /// Turn a non-success response into an error, preferring the structured
    /// `RemoteException` body when the NameNode sends one.
    async fn remote_error(resp: Response) -> GatewayError {
        let status = resp.status().as_u16();
        match resp.json::<Value>().await {
            Ok(body) => match body.get("RemoteException") {
                Some(re) => GatewayError::Remote {
                    exception: re
                        .get("exception")
                        .and_then(Value::as_str)
                        .unwrap_or("RemoteException")
                        .to_string(),
                    message: re
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                },
                None => GatewayError::Http(status),
            },
            Err(_) => GatewayError::Http(status),
        }
    }

    async fn expect_json(resp: Response) -> Result<Value> {
        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }
        Ok(resp.json::<Value>().await?)
    }

    /// Run an operation whose response body is `{"boolean": b}`.
    async fn boolean_op(&self, resp: Response) -> Result<bool> {
        let body = Self::expect_json(resp).await?;
        body.get("boolean")
            .and_then(Value::as_bool)
            .ok_or(GatewayError::InvalidResponse)
    }

    /// First hop of CREATE/OPEN: expect a 307 naming the DataNode.
    async fn follow_redirect(resp: Response) -> Result<Url> {
        if resp.status() != StatusCode::TEMPORARY_REDIRECT {
            return Err(Self::remote_error(resp).await);
        }
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(GatewayError::InvalidResponse)?;
        Ok(Url::parse(location)?)
    }

    async fn create_location(&self, path: &str, overwrite: bool) -> Result<Url> {
        let mut url = self.op_url(path, "CREATE");
        url.query_pairs_mut()
            .append_pair("overwrite", if overwrite { "true" } else { "false" });
        let resp = self.http.put(url).send().await?;
        Self::follow_redirect(resp).await
    }

    async fn open_response(&self, path: &str) -> Result<Response> {
        let url = self.op_url(path, "OPEN");
        let resp = self.http.get(url).send().await?;
        // Some deployments serve short files from the NameNode proxy
        // directly instead of redirecting.
        if resp.status().is_success() {
            return Ok(resp);
        }
        let location = Self::follow_redirect(resp).await?;
        let resp = self.http.get(location).send().await?;
        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }
        Ok(resp)
    }
}

#[async_trait]
impl DfsClient for WebHdfsClient {
    async fn mkdirs(&self, path: &str) -> Result<bool> {
        let resp = self.http.put(self.op_url(path, "MKDIRS")).send().await?;
        self.boolean_op(resp).await
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<bool> {
        let mut url = self.op_url(path, "DELETE");
        url.query_pairs_mut()
            .append_pair("recursive", if recursive { "true" } else { "false" });
        let resp = self.http.delete(url).send().await?;
        self.boolean_op(resp).await
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<bool> {
        let mut url = self.op_url(src, "RENAME");
        url.query_pairs_mut()
            .append_pair("destination", &native_path(dst));
        let resp = self.http.put(url).send().await?;
        self.boolean_op(resp).await
    }

    async fn status(&self, path: &str) -> Result<Option<FileStatus>> {
        let resp = self
            .http
            .get(self.op_url(path, "GETFILESTATUS"))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = Self::expect_json(resp).await?;
        let status = body
            .get("FileStatus")
            .ok_or(GatewayError::InvalidResponse)?;
        Ok(Some(parse_file_status(status, &native_path(path))))
    }

    async fn write(&self, path: &str, data: Vec<u8>, overwrite: bool) -> Result<()> {
        let location = self.create_location(path, overwrite).await?;
        let resp = self.http.put(location).body(data).send().await?;
        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }
        Ok(())
    }

    async fn write_from(&self, path: &str, reader: BoxReader) -> Result<u64> {
        let location = self.create_location(path, false).await?;
        let written = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&written);
        let stream = ReaderStream::with_capacity(reader, COPY_BUF_SIZE).inspect_ok(move |chunk| {
            counter.fetch_add(chunk.len() as u64, Ordering::Relaxed);
        });
        let resp = self
            .http
            .put(location)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }
        let n = written.load(Ordering::Relaxed);
        debug!(path, bytes = n, "streamed upload complete");
        Ok(n)
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self.open_response(path).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn read_into(
        &self,
        path: &str,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64> {
        let resp = self.open_response(path).await?;
        let mut stream = resp.bytes_stream();
        let mut copied = 0u64;
        while let Some(chunk) = stream.try_next().await? {
            writer.write_all(&chunk).await?;
            copied += chunk.len() as u64;
        }
        writer.flush().await?;
        debug!(path, bytes = copied, "streamed download complete");
        Ok(copied)
    }

    async fn list_status(&self, path: &str) -> Result<Vec<FileStatus>> {
        let resp = self
            .http
            .get(self.op_url(path, "LISTSTATUS"))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(native_path(path)));
        }
        let body = Self::expect_json(resp).await?;
        let entries = body
            .get("FileStatuses")
            .and_then(|v| v.get("FileStatus"))
            .and_then(Value::as_array)
            .ok_or(GatewayError::InvalidResponse)?;
        let parent = native_path(path);
        Ok(entries
            .iter()
            .map(|entry| {
                let suffix = entry
                    .get("pathSuffix")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                parse_file_status(entry, &join_child(&parent, suffix))
            })
            .collect())
    }

    async fn block_locations(
        &self,
        path: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<BlockLocation>> {
        let mut url = self.op_url(path, "GETFILEBLOCKLOCATIONS");
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("length", &length.to_string());
        let resp = self.http.get(url).send().await?;
        let body = Self::expect_json(resp).await?;
        parse_block_locations(&body)
    }

    fn cluster_admin(&self) -> Option<&dyn ClusterAdmin> {
        Some(self)
    }
}

#[async_trait]
impl ClusterAdmin for WebHdfsClient {
    /// Node summaries come from the NameNode JMX endpoint; the FileSystem
    /// surface of WebHDFS does not expose them.
    async fn datanode_stats(&self) -> Result<Vec<DatanodeStatus>> {
        let mut url = self.endpoint.clone();
        url.set_path("/jmx");
        url.query_pairs_mut()
            .append_pair("qry", "Hadoop:service=NameNode,name=NameNodeInfo");
        let resp = self.http.get(url).send().await?;
        let body = Self::expect_json(resp).await?;
        parse_datanode_stats(&body)
    }
}

fn join_child(parent: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        parent.to_string()
    } else if parent.ends_with('/') {
        format!("{parent}{suffix}")
    } else {
        format!("{parent}/{suffix}")
    }
}

fn parse_file_status(value: &Value, path: &str) -> FileStatus {
    FileStatus {
        path: path.to_string(),
        length: value.get("length").and_then(Value::as_u64).unwrap_or(0),
        directory: value.get("type").and_then(Value::as_str) == Some("DIRECTORY"),
        modification_time: value
            .get("modificationTime")
            .and_then(Value::as_i64)
            .unwrap_or(0),
    }
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_block_locations(body: &Value) -> Result<Vec<BlockLocation>> {
    let blocks = body
        .get("BlockLocations")
        .and_then(|v| v.get("BlockLocation"))
        .and_then(Value::as_array)
        .ok_or(GatewayError::InvalidResponse)?;
    Ok(blocks
        .iter()
        .map(|b| BlockLocation {
            hosts: string_array(b.get("hosts")),
            names: string_array(b.get("names")),
            topology_paths: string_array(b.get("topologyPaths")),
            offset: b.get("offset").and_then(Value::as_u64).unwrap_or(0),
            length: b.get("length").and_then(Value::as_u64).unwrap_or(0),
            corrupt: b.get("corrupt").and_then(Value::as_bool).unwrap_or(false),
        })
        .collect())
}

/// The NameNodeInfo bean reports live and dead nodes as JSON maps that are
/// themselves string-encoded inside the bean.
fn parse_datanode_stats(body: &Value) -> Result<Vec<DatanodeStatus>> {
    let bean = body
        .get("beans")
        .and_then(Value::as_array)
        .and_then(|beans| beans.first())
        .ok_or(GatewayError::InvalidResponse)?;
    let mut nodes = Vec::new();
    collect_nodes(bean.get("LiveNodes"), NodeState::Live, &mut nodes)?;
    collect_nodes(bean.get("DeadNodes"), NodeState::Dead, &mut nodes)?;
    Ok(nodes)
}

fn collect_nodes(
    raw: Option<&Value>,
    state: NodeState,
    out: &mut Vec<DatanodeStatus>,
) -> Result<()> {
    let Some(raw) = raw.and_then(Value::as_str) else {
        return Ok(());
    };
    let map: Value = serde_json::from_str(raw)?;
    let Some(map) = map.as_object() else {
        return Ok(());
    };
    for (name, info) in map {
        out.push(DatanodeStatus {
            name: name.clone(),
            host: info
                .get("xferaddr")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            state,
            capacity: info.get("capacity").and_then(Value::as_u64).unwrap_or(0),
            used: info.get("usedSpace").and_then(Value::as_u64).unwrap_or(0),
            remaining: info.get("remaining").and_then(Value::as_u64).unwrap_or(0),
            last_contact: info.get("lastContact").and_then(Value::as_u64).unwrap_or(0),
        });
    }
    Ok(())
}
