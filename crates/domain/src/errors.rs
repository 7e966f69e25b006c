use std::net::SocketAddr;
use thiserror::Error;

/// Decode-time failures. Any of these means the datagram is not a valid
/// DNS message; the engine drops such queries without a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("message shorter than the {len}-byte header", len = crate::wire::HEADER_LEN)]
    MessageTooShort(usize),

    #[error("message truncated while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("name exceeds {max} octets", max = crate::name::MAX_NAME_LEN)]
    NameTooLong(usize),

    #[error("compression pointer does not point backwards")]
    PointerLoop,

    #[error("compression pointer chain exceeds {0} hops")]
    TooManyPointerHops(usize),

    #[error("reserved label type byte {0:#04x}")]
    ReservedLabelType(u8),

    #[error("{section} count declares {declared} entries, only {decoded} decodable")]
    CountMismatch {
        section: &'static str,
        declared: u16,
        decoded: u16,
    },

    #[error("record data length declares {declared} octets, {consumed} consumed")]
    RdataLengthMismatch { declared: usize, consumed: usize },

    #[error("{0} trailing bytes after the last record")]
    TrailingBytes(usize),
}

/// Per-attempt and terminal failures of the upstream client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream {server} did not respond within the timeout")]
    Timeout { server: SocketAddr },

    #[error("transport error talking to {server}: {detail}")]
    Transport { server: SocketAddr, detail: String },

    #[error("upstream {server} response did not match the query")]
    ResponseMismatch { server: SocketAddr },

    #[error("all {attempts} upstream servers failed")]
    AllFailed { attempts: usize },
}

/// Service-lifecycle misuse, surfaced to the caller as a typed failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("service is not running")]
    NotRunning,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed message: {0}")]
    Malformed(#[from] WireError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation. Unreachable in normal operation;
    /// if it ever surfaces it must not be swallowed.
    #[error("cache inconsistency: {0}")]
    CacheInconsistency(String),
}
