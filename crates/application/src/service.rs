use crate::use_cases::{QueryOutcome, ResolveQueryUseCase};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use stubdns_domain::{DomainError, ServiceError};
use tracing::info;

/// Lifecycle state of the resolver service. Owned exclusively by
/// `DnsService`; observers receive copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

/// Start/stop tracking around the resolution engine.
///
/// The surrounding transport harness owns the listening socket; it
/// calls `handle_datagram` with each received datagram and sends back
/// whatever bytes come out. Transitions are serialized under one lock,
/// so concurrent `start`/`stop` calls cannot interleave mid-transition.
pub struct DnsService {
    state: Mutex<ServiceState>,
    engine: Arc<ResolveQueryUseCase>,
}

impl DnsService {
    pub fn new(engine: Arc<ResolveQueryUseCase>) -> Self {
        Self {
            state: Mutex::new(ServiceState::Stopped),
            engine,
        }
    }

    /// Current state, by value.
    pub fn state(&self) -> ServiceState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Idempotent: starting a running service reports `AlreadyRunning`.
    pub fn start(&self) -> StartOutcome {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match *state {
            ServiceState::Stopped => {
                *state = ServiceState::Starting;
                info!("starting DNS service");
                *state = ServiceState::Running;
                info!("DNS service running");
                StartOutcome::Started
            }
            ServiceState::Starting | ServiceState::Running | ServiceState::Stopping => {
                info!("DNS service already running");
                StartOutcome::AlreadyRunning
            }
        }
    }

    /// Idempotent: stopping a stopped service reports `NotRunning`.
    pub fn stop(&self) -> StopOutcome {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match *state {
            ServiceState::Running => {
                *state = ServiceState::Stopping;
                info!("stopping DNS service");
                *state = ServiceState::Stopped;
                info!("DNS service stopped");
                StopOutcome::Stopped
            }
            ServiceState::Stopped | ServiceState::Starting | ServiceState::Stopping => {
                info!("DNS service not running");
                StopOutcome::NotRunning
            }
        }
    }

    /// Resolves one raw datagram. Rejected with
    /// `ServiceError::NotRunning` unless the service is `Running`; a
    /// `DomainError::Malformed` result means the caller should drop
    /// the datagram without responding.
    pub async fn handle_datagram(
        &self,
        datagram: &[u8],
        peer: SocketAddr,
    ) -> Result<QueryOutcome, DomainError> {
        if self.state() != ServiceState::Running {
            return Err(ServiceError::NotRunning.into());
        }
        self.engine
            .handle_query(datagram, peer, Instant::now())
            .await
            .map_err(DomainError::from)
    }
}
