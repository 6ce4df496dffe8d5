//! Wire types describing remote filesystem entries and cluster state.

use serde::{Deserialize, Serialize};

/// Status of a single remote path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    /// Absolute path on the remote filesystem (no scheme/authority).
    pub path: String,
    /// File length in bytes (0 for directories).
    pub length: u64,
    /// Whether the path is a directory.
    pub directory: bool,
    /// Modification time, milliseconds since the epoch.
    pub modification_time: i64,
}

impl FileStatus {
    /// Check if this status describes a plain file.
    pub fn is_file(&self) -> bool {
        !self.directory
    }
}

/// Storage-node locations for one block of a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLocation {
    /// Hostnames of the nodes holding this block.
    pub hosts: Vec<String>,
    /// host:port transfer addresses of the nodes.
    pub names: Vec<String>,
    /// Rack-topology paths of the nodes.
    #[serde(default)]
    pub topology_paths: Vec<String>,
    /// Byte offset of the block within the file.
    pub offset: u64,
    /// Block length in bytes.
    pub length: u64,
    /// Whether the block is marked corrupt.
    #[serde(default)]
    pub corrupt: bool,
}

/// Liveness of a storage node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Live,
    Dead,
}

/// Status summary of one storage node in the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatanodeStatus {
    /// Node name as reported by the coordinator (usually host:port).
    pub name: String,
    /// Transfer address of the node.
    pub host: String,
    /// Live or dead.
    pub state: NodeState,
    /// Configured capacity in bytes.
    pub capacity: u64,
    /// Bytes used by the distributed filesystem.
    pub used: u64,
    /// Bytes remaining.
    pub remaining: u64,
    /// Seconds since the node last checked in.
    pub last_contact: u64,
}
