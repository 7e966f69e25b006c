//! DNS wire-format codec (RFC 1035 §4).
//!
//! The decoder accepts compressed names and validates every length
//! against the buffer; the encoder is deterministic and never emits
//! compression. `decode(encode(m)) == m` for any constructible message.

mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::encode;

/// Fixed DNS header size in octets.
pub const HEADER_LEN: usize = 12;

/// Upper bound on compression pointer chains per name. Well-formed
/// messages need a handful at most; anything deeper is hostile input.
pub const MAX_POINTER_HOPS: usize = 16;
