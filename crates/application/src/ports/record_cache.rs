use std::time::Instant;
use stubdns_domain::{DnsName, Question, RecordClass, RecordType, ResourceRecord};

/// Cache key: (name, type, class). `DnsName` hashes and compares
/// case-insensitively, so no separate normalization is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: DnsName,
    pub rtype: RecordType,
    pub class: RecordClass,
}

impl CacheKey {
    pub fn new(name: DnsName, rtype: RecordType, class: RecordClass) -> Self {
        Self { name, rtype, class }
    }
}

impl From<&Question> for CacheKey {
    fn from(question: &Question) -> Self {
        Self::new(question.name.clone(), question.rtype, question.class)
    }
}

/// Port for the TTL-aware record store shared by all in-flight
/// queries. Implementations must give each `get`/`put` a consistent
/// snapshot of the record set for its key.
///
/// The caller supplies `now` so expiry is a pure function of the
/// arguments; tests never have to sleep.
pub trait RecordCache: Send + Sync {
    /// Returns the live records for `key`, with TTLs adjusted to the
    /// remaining lifetime, or `None` if absent or expired. Reading an
    /// expired entry evicts it.
    fn get(&self, key: &CacheKey, now: Instant) -> Option<Vec<ResourceRecord>>;

    /// Stores `records` under `key`, replacing any previous entry. The
    /// entry expires after the minimum TTL among the records; a
    /// minimum of zero (or an empty set) stores nothing.
    fn put(&self, key: CacheKey, records: Vec<ResourceRecord>, now: Instant);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
