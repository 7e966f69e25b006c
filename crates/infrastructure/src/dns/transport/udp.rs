//! UDP transport for upstream queries (RFC 1035 §4.2.1).
//!
//! One ephemeral socket per exchange, connected to the server so the
//! kernel discards datagrams from any other source.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use stubdns_domain::UpstreamError;
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Sends one datagram and waits for one reply.
#[derive(Debug, Default)]
pub struct UdpExchange;

impl UdpExchange {
    pub fn new() -> Self {
        Self
    }

    /// Single request/response exchange with `server`. The whole
    /// exchange (bind, send, receive) is bounded by `timeout`.
    pub async fn exchange(
        &self,
        payload: &[u8],
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<Vec<u8>, UpstreamError> {
        tokio::time::timeout(timeout, self.exchange_inner(payload, server))
            .await
            .map_err(|_| UpstreamError::Timeout { server })?
    }

    async fn exchange_inner(
        &self,
        payload: &[u8],
        server: SocketAddr,
    ) -> Result<Vec<u8>, UpstreamError> {
        let bind_addr = if server.is_ipv4() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
        } else {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| UpstreamError::Transport {
                server,
                detail: format!("failed to bind UDP socket: {e}"),
            })?;
        socket
            .connect(server)
            .await
            .map_err(|e| UpstreamError::Transport {
                server,
                detail: format!("failed to connect UDP socket: {e}"),
            })?;

        let bytes_sent = socket
            .send(payload)
            .await
            .map_err(|e| UpstreamError::Transport {
                server,
                detail: format!("failed to send query: {e}"),
            })?;
        debug!(server = %server, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received =
            socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| UpstreamError::Transport {
                    server,
                    detail: format!("failed to receive response: {e}"),
                })?;
        recv_buf.truncate(bytes_received);
        debug!(server = %server, bytes_received, "UDP response received");

        Ok(recv_buf)
    }
}
