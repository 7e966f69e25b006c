//! Full-stack scenario: real cache, real failover client, scripted
//! loopback upstream. Only the listening socket is out of scope; raw
//! datagrams go straight into the service.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stubdns_application::{DnsService, OutcomeKind, ResolveQueryUseCase, StartOutcome, StopOutcome};
use stubdns_domain::{
    wire, DnsConfig, DomainError, Message, Question, RData, RecordClass, RecordType,
    ResourceRecord, ResponseCode, ServiceError,
};
use stubdns_infrastructure::{DnsRecordCache, FailoverUpstreamClient};
use tokio::net::UdpSocket;

/// Loopback upstream that answers every A query with 93.184.216.34,
/// TTL 300, and counts the queries it saw.
async fn spawn_upstream() -> (SocketAddr, Arc<AtomicUsize>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    let queries_seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&queries_seen);

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        loop {
            let (len, peer) = match socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(_) => return,
            };
            counter.fetch_add(1, Ordering::SeqCst);

            let query = wire::decode(&buf[..len]).unwrap();
            let record = ResourceRecord::new(
                query.questions[0].name.clone(),
                RecordClass::In,
                300,
                RData::A(Ipv4Addr::new(93, 184, 216, 34)),
            );
            let response = Message::answer(&query, vec![record]);
            let _ = socket.send_to(&wire::encode(&response), peer).await;
        }
    });

    (addr, queries_seen)
}

fn build_service(upstream_addr: SocketAddr) -> DnsService {
    let config = DnsConfig {
        upstream_servers: vec![upstream_addr.to_string()],
        attempt_timeout_ms: 500,
        query_deadline_ms: 2000,
        ..DnsConfig::default()
    };
    let cache = Arc::new(DnsRecordCache::new(config.cache_max_entries));
    let upstream = Arc::new(FailoverUpstreamClient::new());
    let engine = Arc::new(ResolveQueryUseCase::new(cache, upstream, &config).unwrap());
    DnsService::new(engine)
}

fn a_query(id: u16, domain: &str) -> Vec<u8> {
    let question = Question::new(domain.parse().unwrap(), RecordType::A, RecordClass::In);
    wire::encode(&Message::query(id, question))
}

fn client_addr() -> SocketAddr {
    "192.0.2.10:41953".parse().unwrap()
}

#[tokio::test]
async fn resolve_cache_and_shut_down() {
    let (upstream_addr, queries_seen) = spawn_upstream().await;
    let service = build_service(upstream_addr);

    // Datagrams are refused until the service is started.
    let refused = service
        .handle_datagram(&a_query(1, "example.com"), client_addr())
        .await;
    assert_eq!(
        refused.unwrap_err(),
        DomainError::Service(ServiceError::NotRunning)
    );

    assert_eq!(service.start(), StartOutcome::Started);
    assert_eq!(service.start(), StartOutcome::AlreadyRunning);

    // First query goes upstream.
    let outcome = service
        .handle_datagram(&a_query(0x1111, "example.com"), client_addr())
        .await
        .unwrap();
    assert_eq!(outcome.kind, OutcomeKind::Forwarded);
    assert_eq!(queries_seen.load(Ordering::SeqCst), 1);

    let response = wire::decode(&outcome.response).unwrap();
    assert_eq!(response.id, 0x1111);
    assert!(response.flags.response);
    assert!(response.flags.recursion_available);
    assert_eq!(response.flags.rcode, ResponseCode::NoError);
    assert_eq!(response.answers.len(), 1);
    assert_eq!(
        response.answers[0].data,
        RData::A(Ipv4Addr::new(93, 184, 216, 34))
    );

    // Second identical query is served from cache; the upstream never
    // sees it, and the client's new transaction id is still honored.
    let outcome = service
        .handle_datagram(&a_query(0x2222, "EXAMPLE.com"), client_addr())
        .await
        .unwrap();
    assert_eq!(outcome.kind, OutcomeKind::CacheHit);
    assert_eq!(queries_seen.load(Ordering::SeqCst), 1);

    let response = wire::decode(&outcome.response).unwrap();
    assert_eq!(response.id, 0x2222);
    assert_eq!(response.answers.len(), 1);
    assert!(response.answers[0].ttl <= 300);

    assert_eq!(service.stop(), StopOutcome::Stopped);
    assert_eq!(service.stop(), StopOutcome::NotRunning);

    let refused = service
        .handle_datagram(&a_query(3, "example.com"), client_addr())
        .await;
    assert_eq!(
        refused.unwrap_err(),
        DomainError::Service(ServiceError::NotRunning)
    );
}

#[tokio::test]
async fn different_names_are_cached_independently() {
    let (upstream_addr, queries_seen) = spawn_upstream().await;
    let service = build_service(upstream_addr);
    service.start();

    let first = service
        .handle_datagram(&a_query(1, "one.example"), client_addr())
        .await
        .unwrap();
    let second = service
        .handle_datagram(&a_query(2, "two.example"), client_addr())
        .await
        .unwrap();

    assert_eq!(first.kind, OutcomeKind::Forwarded);
    assert_eq!(second.kind, OutcomeKind::Forwarded);
    assert_eq!(queries_seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_upstream_yields_servfail() {
    // Bind then drop, so the port is very likely unoccupied.
    let unused = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = unused.local_addr().unwrap();
    drop(unused);

    let config = DnsConfig {
        upstream_servers: vec![dead_addr.to_string()],
        attempt_timeout_ms: 100,
        query_deadline_ms: 400,
        ..DnsConfig::default()
    };
    let cache = Arc::new(DnsRecordCache::new(config.cache_max_entries));
    let upstream = Arc::new(FailoverUpstreamClient::new());
    let engine = Arc::new(ResolveQueryUseCase::new(cache, upstream, &config).unwrap());
    let service = DnsService::new(engine);
    service.start();

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        service.handle_datagram(&a_query(4, "example.com"), client_addr()),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(outcome.kind, OutcomeKind::ServFail);
    let response = wire::decode(&outcome.response).unwrap();
    assert_eq!(response.id, 4);
    assert_eq!(response.flags.rcode, ResponseCode::ServFail);
}
