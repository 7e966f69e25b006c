mod record_cache;
mod upstream_client;

pub use record_cache::{CacheKey, RecordCache};
pub use upstream_client::UpstreamClient;
