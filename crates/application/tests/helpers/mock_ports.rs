use async_trait::async_trait;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use stubdns_application::ports::{CacheKey, RecordCache, UpstreamClient};
use stubdns_domain::{
    Message, Question, RData, RecordClass, RecordType, ResourceRecord, ResponseCode, UpstreamError,
};

pub const PEER: &str = "192.0.2.10:41953";

pub fn peer() -> SocketAddr {
    PEER.parse().unwrap()
}

pub fn a_question(domain: &str) -> Question {
    Question::new(domain.parse().unwrap(), RecordType::A, RecordClass::In)
}

pub fn a_record(domain: &str, ttl: u32, octets: [u8; 4]) -> ResourceRecord {
    ResourceRecord::new(
        domain.parse().unwrap(),
        RecordClass::In,
        ttl,
        RData::A(Ipv4Addr::from(octets)),
    )
}

/// What the mock upstream does with every query.
pub enum UpstreamBehavior {
    /// Respond with these answer records.
    Answer(Vec<ResourceRecord>),
    /// Respond with an empty answer and this rcode.
    Rcode(ResponseCode),
    /// Fail every attempt.
    AllFailed,
    /// Never respond (engine deadline must cut this off).
    Hang,
}

pub struct MockUpstreamClient {
    behavior: UpstreamBehavior,
    calls: AtomicUsize,
}

impl MockUpstreamClient {
    pub fn new(behavior: UpstreamBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn query(
        &self,
        query: &Message,
        servers: &[SocketAddr],
        _timeout: Duration,
    ) -> Result<Message, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            UpstreamBehavior::Answer(records) => Ok(Message::answer(query, records.clone())),
            UpstreamBehavior::Rcode(rcode) => Ok(Message::error_response(query, *rcode)),
            UpstreamBehavior::AllFailed => Err(UpstreamError::AllFailed {
                attempts: servers.len(),
            }),
            UpstreamBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(UpstreamError::AllFailed { attempts: 0 })
            }
        }
    }
}

/// In-memory cache double. No TTL logic: whatever is stored is served.
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<CacheKey, Vec<ResourceRecord>>>,
    puts: AtomicUsize,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload(&self, key: CacheKey, records: Vec<ResourceRecord>) {
        self.entries.lock().unwrap().insert(key, records);
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn stored(&self, key: &CacheKey) -> Option<Vec<ResourceRecord>> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

impl RecordCache for RecordingCache {
    fn get(&self, key: &CacheKey, _now: Instant) -> Option<Vec<ResourceRecord>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: CacheKey, records: Vec<ResourceRecord>, _now: Instant) {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().insert(key, records);
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
