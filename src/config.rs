//! Gateway configuration.

use std::net::SocketAddr;
use std::str::FromStr;

/// How faults are surfaced at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorSurface {
    /// Every response is HTTP 200; faults are flattened into the payload
    /// (failure message, `false`, empty array). Matches the original
    /// gateway contract, where callers inspect the body, not the status.
    #[default]
    Legacy,
    /// Faults map to real HTTP status codes with a JSON error body.
    Strict,
}

impl FromStr for ErrorSurface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(ErrorSurface::Legacy),
            "strict" => Ok(ErrorSurface::Strict),
            other => Err(format!("unknown error surface: {other} (expected legacy|strict)")),
        }
    }
}

/// Configuration threaded through the gateway at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Base URI prepended verbatim to every caller-supplied path. Empty
    /// string passes caller paths through untouched.
    pub base_uri: String,
    /// Fault surfacing mode at the HTTP boundary.
    pub error_surface: ErrorSurface,
    /// Refuse caller paths containing `.` or `..` segments. Off by default:
    /// the original gateway concatenated caller input verbatim, and callers
    /// may rely on that.
    pub reject_dot_segments: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 8080).into(),
            base_uri: String::new(),
            error_surface: ErrorSurface::Legacy,
            reject_dot_segments: false,
        }
    }
}
