pub mod dns;

pub use dns::cache::{CacheMetricsSnapshot, DnsRecordCache};
pub use dns::transport::UdpExchange;
pub use dns::upstream::FailoverUpstreamClient;
