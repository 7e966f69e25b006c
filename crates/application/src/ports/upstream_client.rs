use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use stubdns_domain::{Message, UpstreamError};

/// Port for forwarding a query to upstream servers.
///
/// Implementations try `servers` in order, spending at most `timeout`
/// per attempt, and return the first response whose transaction id and
/// echoed question match the attempt; a mismatched response counts as
/// that attempt's failure. No state is kept between calls.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn query(
        &self,
        query: &Message,
        servers: &[SocketAddr],
        timeout: Duration,
    ) -> Result<Message, UpstreamError>;
}
