use crate::ports::{CacheKey, RecordCache, UpstreamClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use stubdns_domain::{
    wire, DnsConfig, DomainError, Message, OpCode, Question, ResponseCode, WireError,
};
use tracing::{debug, warn};

/// How a query was answered, reported to the surrounding layer for
/// observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    CacheHit,
    /// Answered from an upstream response (which may itself carry a
    /// non-zero response code, e.g. NXDOMAIN).
    Forwarded,
    /// Every upstream attempt failed or the overall deadline elapsed.
    ServFail,
    /// Query was structurally valid DNS but not something this
    /// resolver serves (no question, or several).
    FormErr,
    /// Non-QUERY opcode.
    NotImplemented,
}

/// Response bytes ready for the transport layer, plus the outcome kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub response: Vec<u8>,
    pub kind: OutcomeKind,
}

impl QueryOutcome {
    fn new(response: &Message, kind: OutcomeKind) -> Self {
        Self {
            response: wire::encode(response),
            kind,
        }
    }
}

/// Per-query state: created on cache miss, dropped once the response
/// is produced. Nothing query-specific outlives a resolution.
struct PendingQuery {
    id: u16,
    question: Question,
    peer: SocketAddr,
    deadline: Duration,
}

/// The resolution engine: decode, cache check, upstream forward with
/// an overall deadline, cache store, encode.
///
/// Stateless across queries except through the shared cache; the
/// fields here are configuration and collaborators only.
pub struct ResolveQueryUseCase {
    cache: Arc<dyn RecordCache>,
    upstream: Arc<dyn UpstreamClient>,
    servers: Vec<SocketAddr>,
    attempt_timeout: Duration,
    query_deadline: Duration,
    cache_enabled: bool,
}

impl ResolveQueryUseCase {
    pub fn new(
        cache: Arc<dyn RecordCache>,
        upstream: Arc<dyn UpstreamClient>,
        config: &DnsConfig,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            cache,
            upstream,
            servers: config.upstream_addrs()?,
            attempt_timeout: config.attempt_timeout(),
            query_deadline: config.query_deadline(),
            cache_enabled: config.cache_enabled,
        })
    }

    /// Resolves one raw datagram from `peer`.
    ///
    /// `Err(WireError)` means the datagram was not valid DNS; the
    /// caller sends nothing back (standard silent-drop behavior) but
    /// can log the error kind. Every other path yields response bytes.
    pub async fn handle_query(
        &self,
        datagram: &[u8],
        peer: SocketAddr,
        now: Instant,
    ) -> Result<QueryOutcome, WireError> {
        let query = match wire::decode(datagram) {
            Ok(message) => message,
            Err(e) => {
                warn!(%peer, error = %e, "dropping malformed datagram");
                return Err(e);
            }
        };

        if query.flags.opcode != OpCode::Query {
            debug!(%peer, opcode = ?query.flags.opcode, "unsupported opcode");
            return Ok(QueryOutcome::new(
                &Message::error_response(&query, ResponseCode::NotImp),
                OutcomeKind::NotImplemented,
            ));
        }

        let question = match query.questions.as_slice() {
            [question] if !query.flags.response => question.clone(),
            _ => {
                debug!(%peer, questions = query.questions.len(), "not a single-question query");
                return Ok(QueryOutcome::new(
                    &Message::error_response(&query, ResponseCode::FormErr),
                    OutcomeKind::FormErr,
                ));
            }
        };

        if self.cache_enabled {
            let key = CacheKey::from(&question);
            if let Some(records) = self.cache.get(&key, now) {
                debug!(name = %question.name, rtype = %question.rtype, "cache hit");
                return Ok(QueryOutcome::new(
                    &Message::answer(&query, records),
                    OutcomeKind::CacheHit,
                ));
            }
        }

        let pending = PendingQuery {
            id: query.id,
            question,
            peer,
            deadline: self.query_deadline,
        };
        self.forward(&query, pending, now).await
    }

    /// Cache-miss path: forward upstream under the overall deadline,
    /// store cacheable answers, relay the response.
    async fn forward(
        &self,
        query: &Message,
        pending: PendingQuery,
        now: Instant,
    ) -> Result<QueryOutcome, WireError> {
        debug!(
            id = pending.id,
            name = %pending.question.name,
            rtype = %pending.question.rtype,
            peer = %pending.peer,
            "cache miss, forwarding upstream"
        );

        let attempt = self
            .upstream
            .query(query, &self.servers, self.attempt_timeout);

        let upstream_response = match tokio::time::timeout(pending.deadline, attempt).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(name = %pending.question.name, error = %e, "upstream resolution failed");
                return Ok(QueryOutcome::new(
                    &Message::error_response(query, ResponseCode::ServFail),
                    OutcomeKind::ServFail,
                ));
            }
            Err(_) => {
                warn!(
                    name = %pending.question.name,
                    deadline_ms = pending.deadline.as_millis() as u64,
                    "query deadline elapsed, abandoning remaining attempts"
                );
                return Ok(QueryOutcome::new(
                    &Message::error_response(query, ResponseCode::ServFail),
                    OutcomeKind::ServFail,
                ));
            }
        };

        if self.cache_enabled && upstream_response.flags.rcode == ResponseCode::NoError {
            // TTL=0 record sets are the cache's no-op case; the
            // records are still relayed to the client once.
            self.cache.put(
                CacheKey::from(&pending.question),
                upstream_response.answers.clone(),
                now,
            );
        }

        debug!(
            name = %pending.question.name,
            rcode = %upstream_response.flags.rcode,
            answers = upstream_response.answers.len(),
            "relaying upstream response"
        );
        Ok(QueryOutcome::new(
            &Message::forwarded(query, &upstream_response),
            OutcomeKind::Forwarded,
        ))
    }
}
