//! stubdns domain layer: DNS data model, wire codec and configuration.
//!
//! This crate is pure data: no sockets, no async, no clocks. The
//! application layer orchestrates resolution on top of these types and
//! the infrastructure layer supplies the I/O.
pub mod config;
pub mod errors;
pub mod message;
pub mod name;
pub mod record;
pub mod wire;

pub use config::DnsConfig;
pub use errors::{DomainError, ServiceError, UpstreamError, WireError};
pub use message::{Flags, Message, OpCode, Question, ResponseCode};
pub use name::DnsName;
pub use record::{RData, RecordClass, RecordType, ResourceRecord};
