mod udp;

pub use udp::UdpExchange;
