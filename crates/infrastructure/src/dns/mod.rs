pub mod cache;
pub mod transport;
pub mod upstream;
