use super::RecordType;
use crate::name::DnsName;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Type-specific record data.
///
/// Name-bearing variants hold decompressed `DnsName`s, so a record
/// decoded from a compressed message can be re-encoded or cached
/// without dangling pointer offsets. Types without a variant here are
/// carried as opaque bytes; the decoder only produces `Opaque` for
/// types whose rdata cannot embed compression pointers in practice
/// (the typed variants cover the RFC 1035 name-bearing set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(DnsName),
    Ns(DnsName),
    Ptr(DnsName),
    Mx {
        preference: u16,
        exchange: DnsName,
    },
    /// One or more character-strings, each at most 255 octets.
    Txt(Vec<Vec<u8>>),
    Soa {
        mname: DnsName,
        rname: DnsName,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Opaque {
        rtype: RecordType,
        data: Vec<u8>,
    },
}

impl RData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RData::A(_) => RecordType::A,
            RData::Aaaa(_) => RecordType::Aaaa,
            RData::Cname(_) => RecordType::Cname,
            RData::Ns(_) => RecordType::Ns,
            RData::Ptr(_) => RecordType::Ptr,
            RData::Mx { .. } => RecordType::Mx,
            RData::Txt(_) => RecordType::Txt,
            RData::Soa { .. } => RecordType::Soa,
            RData::Opaque { rtype, .. } => *rtype,
        }
    }
}
