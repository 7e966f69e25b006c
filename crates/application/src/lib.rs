//! stubdns application layer: resolution engine and service lifecycle.
pub mod ports;
pub mod service;
pub mod use_cases;

pub use service::{DnsService, ServiceState, StartOutcome, StopOutcome};
pub use use_cases::{OutcomeKind, QueryOutcome, ResolveQueryUseCase};
