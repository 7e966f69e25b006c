//! Upstream forwarding with ordered failover.

use crate::dns::transport::UdpExchange;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use stubdns_application::ports::UpstreamClient;
use stubdns_domain::{wire, Message, UpstreamError};
use tracing::{debug, warn};

/// Tries upstream servers in configured order, one attempt each.
///
/// Every attempt gets a fresh random transaction id, and a reply is
/// accepted only if it is a response carrying that id and echoing the
/// question. Anything else fails the attempt and the next server is
/// tried.
#[derive(Debug, Default)]
pub struct FailoverUpstreamClient {
    transport: UdpExchange,
}

impl FailoverUpstreamClient {
    pub fn new() -> Self {
        Self {
            transport: UdpExchange::new(),
        }
    }

    fn matches(attempt: &Message, response: &Message) -> bool {
        response.flags.response
            && response.id == attempt.id
            && response.questions == attempt.questions
    }
}

#[async_trait]
impl UpstreamClient for FailoverUpstreamClient {
    async fn query(
        &self,
        query: &Message,
        servers: &[SocketAddr],
        timeout: Duration,
    ) -> Result<Message, UpstreamError> {
        for &server in servers {
            let mut attempt = query.clone();
            attempt.id = fastrand::u16(..);
            let payload = wire::encode(&attempt);

            let raw = match self.transport.exchange(&payload, server, timeout).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(server = %server, error = %e, "upstream attempt failed");
                    continue;
                }
            };

            let response = match wire::decode(&raw) {
                Ok(response) => response,
                Err(e) => {
                    warn!(server = %server, error = %e, "upstream sent malformed response");
                    continue;
                }
            };

            if !Self::matches(&attempt, &response) {
                let mismatch = UpstreamError::ResponseMismatch { server };
                warn!(server = %server, error = %mismatch, "rejecting upstream response");
                continue;
            }

            debug!(
                server = %server,
                id = attempt.id,
                answers = response.answers.len(),
                rcode = %response.flags.rcode,
                "upstream responded"
            );
            return Ok(response);
        }

        Err(UpstreamError::AllFailed {
            attempts: servers.len(),
        })
    }
}
