//! Gateway operations.
//!
//! One method per exposed operation, grouped by concern: directory
//! operations, file content operations, transfers, and listing. Each method
//! resolves its caller paths, acquires one client handle for the duration of
//! the call, and returns a typed result; the HTTP layer decides how faults
//! are surfaced.

mod browse;
mod dir_ops;
mod file_ops;
pub(crate) mod path;
mod transfer;

use std::sync::Arc;

use crate::client::{DfsClient, DfsConnector};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Stateless front over the remote filesystem client.
pub struct Gateway {
    config: GatewayConfig,
    connector: Arc<dyn DfsConnector>,
}

impl Gateway {
    pub fn new(config: GatewayConfig, connector: Arc<dyn DfsConnector>) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Acquire the per-request filesystem handle. The handle is dropped at
    /// the end of the operation's scope on every exit path.
    async fn fs(&self) -> Result<Box<dyn DfsClient>> {
        self.connector.connect().await
    }

    /// Resolve a caller path, enforcing the optional dot-segment filter.
    fn resolve(&self, path: &str) -> Result<String> {
        if self.config.reject_dot_segments && path::has_dot_segments(path) {
            return Err(GatewayError::InvalidPath(path.to_string()));
        }
        Ok(path::resolve(&self.config.base_uri, path))
    }

    /// Qualified form of a caller path for display in messages. Infallible:
    /// failure messages must name the path even when it was rejected.
    pub fn display_path(&self, path: &str) -> String {
        path::resolve(&self.config.base_uri, path)
    }
}
