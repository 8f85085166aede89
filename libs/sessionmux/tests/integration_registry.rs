//! Integration tests for the connection registry
//!
//! These tests verify one-connection-per-origin sharing, including under
//! concurrent acquisition.

mod common;

use common::*;
use sessionmux::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_acquire_reuses_connection() {
    let (registry, factory) = counting_registry();

    let first = registry.acquire("http://host").unwrap();
    let second = registry.acquire("http://host").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(factory.created(), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_distinct_origins_get_distinct_connections() {
    let (registry, factory) = counting_registry();

    let a = registry.acquire("http://host").unwrap();
    let b = registry.acquire("http://host:8080").unwrap();
    let c = registry.acquire("https://host").unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(factory.created(), 3);

    let mut origins = registry.origins();
    origins.sort();
    assert_eq!(origins, vec!["http://host", "http://host:8080", "https://host"]);
}

#[test]
fn test_concurrent_acquire_creates_once() {
    const THREADS: usize = 16;

    let (registry, factory) = counting_registry();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.acquire("http://shared").unwrap()
            })
        })
        .collect();

    let connections: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for connection in &connections[1..] {
        assert!(Arc::ptr_eq(&connections[0], connection));
    }
    assert_eq!(factory.created(), 1);
    verbose_println!("{} callers shared one connection", THREADS);
}

#[test]
fn test_concurrent_acquire_across_origins() {
    const ORIGINS: usize = 4;
    const PER_ORIGIN: usize = 8;

    let (registry, factory) = counting_registry();
    let barrier = Arc::new(Barrier::new(ORIGINS * PER_ORIGIN));

    let handles: Vec<_> = (0..ORIGINS * PER_ORIGIN)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let origin = format!("http://host-{}", i % ORIGINS);
                registry.acquire(&origin).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(factory.created(), ORIGINS);
    assert_eq!(registry.len(), ORIGINS);
}

#[test]
fn test_failed_creation_is_not_cached() {
    let (registry, factory) = failing_registry(1);

    let err = registry.acquire("http://host").err().unwrap();
    match err {
        SessionError::ConnectionUnavailable { origin, .. } => assert_eq!(origin, "http://host"),
        other => panic!("expected ConnectionUnavailable, got {:?}", other),
    }
    assert!(!registry.contains("http://host"));

    assert!(registry.acquire("http://host").is_ok());
    assert_eq!(factory.created(), 1);
}

#[test]
fn test_closure_factory() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let registry = ConnectionRegistry::new(
        move |origin: &str| -> sessionmux::Result<Arc<dyn ConnectionHandle>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(QueuedConnection::new(origin, None)))
        },
    );

    registry.acquire("ws://a").unwrap();
    registry.acquire("ws://a").unwrap();
    registry.acquire("ws://b").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_get_does_not_create() {
    let (registry, factory) = counting_registry();

    assert!(registry.get("http://host").is_none());
    assert_eq!(factory.created(), 0);

    let acquired = registry.acquire("http://host").unwrap();
    let fetched = registry.get("http://host").unwrap();
    assert!(Arc::ptr_eq(&acquired, &fetched));
}

#[test]
fn test_link_status_introspection() {
    let (registry, factory) = counting_registry();
    registry.acquire("http://up").unwrap();
    registry.acquire("http://down").unwrap();

    factory.connection("http://up").unwrap().mark_connected();

    assert_eq!(registry.connected_count(), 1);
    let statuses = registry.link_statuses();
    assert_eq!(statuses.get("http://up"), Some(&true));
    assert_eq!(statuses.get("http://down"), Some(&false));
}
