//! TCP connect prober.
//!
//! Performs a plain connect scan using the operating system's socket API:
//! the handshake is completed and the socket dropped immediately. No data is
//! ever sent or read.

use crate::scanner::traits::{ProbeOutcome, Prober};
use crate::types::{HostResolver, Port};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect prober.
///
/// The target is resolved on every probe so a host that stops resolving
/// mid-scan is noticed. The per-probe timeout bounds resolution and connect
/// together.
pub struct TcpConnectProber {
    resolver: Arc<dyn HostResolver>,
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a new prober.
    ///
    /// # Arguments
    /// * `resolver` - Resolver consulted before each connection attempt
    /// * `timeout` - Hard upper bound on a single probe
    pub fn new(resolver: Arc<dyn HostResolver>, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }

    async fn attempt(&self, target: &str, port: Port) -> ProbeOutcome {
        let ips = match self.resolver.resolve(target).await {
            Ok(ips) => ips,
            Err(e) => return ProbeOutcome::Error(e.to_string()),
        };
        if ips.is_empty() {
            return ProbeOutcome::Error(format!("no addresses for {}", target));
        }

        // Addresses are tried in resolver order; the first accepted
        // connection makes the port open.
        for ip in ips {
            let addr = SocketAddr::new(ip, port.as_u16());
            match TcpStream::connect(addr).await {
                // The stream is dropped here, closing the socket.
                Ok(_stream) => return ProbeOutcome::Open,
                Err(e) => trace!(%addr, error = %e, "connect failed"),
            }
        }
        ProbeOutcome::Closed
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, target: &str, port: Port) -> ProbeOutcome {
        match timeout(self.timeout, self.attempt(target, port)).await {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::Closed,
        }
    }
}
