mod rdata;
mod record_type;

pub use rdata::RData;
pub use record_type::{RecordClass, RecordType};

use crate::name::DnsName;

/// A single DNS resource record: owner name, type, class, TTL and
/// type-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DnsName,
    pub rtype: RecordType,
    pub class: RecordClass,
    /// Remaining time-to-live in seconds. Non-negative by construction.
    pub ttl: u32,
    pub data: RData,
}

impl ResourceRecord {
    pub fn new(name: DnsName, class: RecordClass, ttl: u32, data: RData) -> Self {
        let rtype = data.record_type();
        Self {
            name,
            rtype,
            class,
            ttl,
            data,
        }
    }

    /// Copy of this record with its TTL replaced, used when serving
    /// cached records with their remaining lifetime.
    pub fn with_ttl(&self, ttl: u32) -> Self {
        Self {
            ttl,
            ..self.clone()
        }
    }
}
