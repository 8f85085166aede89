//! Common test utilities for sessionmux integration tests
//!
//! Provides recording sinks and factories that count or refuse connection
//! creation.

#![allow(dead_code)]

use parking_lot::Mutex;
use sessionmux::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Everything a [`RecordingSink`] was told
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Connect,
    Disconnect,
    Message(Payload),
    Event(String, Vec<Value>),
    Error(String),
}

/// Sink that records every callback
#[derive(Default)]
pub struct RecordingSink {
    pub received: Mutex<Vec<Recorded>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<Recorded> {
        self.received.lock().clone()
    }

    pub fn events(&self) -> Vec<(String, Vec<Value>)> {
        self.received
            .lock()
            .iter()
            .filter_map(|r| match r {
                Recorded::Event(name, args) => Some((name.clone(), args.clone())),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn on_connect(&self) {
        self.received.lock().push(Recorded::Connect);
    }

    fn on_disconnect(&self) {
        self.received.lock().push(Recorded::Disconnect);
    }

    fn on_message(&self, payload: Payload) {
        self.received.lock().push(Recorded::Message(payload));
    }

    fn on_event(&self, event: &str, args: &[Value]) {
        self.received
            .lock()
            .push(Recorded::Event(event.to_string(), args.to_vec()));
    }

    fn on_error(&self, message: &str) {
        self.received.lock().push(Recorded::Error(message.to_string()));
    }
}

/// Factory that counts creations and can be told to fail
///
/// Connections are real [`QueuedConnection`]s so tests can inspect what
/// sessions queued.
#[derive(Default)]
pub struct CountingFactory {
    inner: QueuedFactory,
    created: AtomicUsize,
    failures_left: AtomicUsize,
}

impl CountingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the next `n` calls to `create`
    pub fn failing(n: usize) -> Arc<Self> {
        let factory = Self::default();
        factory.failures_left.store(n, Ordering::SeqCst);
        Arc::new(factory)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn connection(&self, origin: &str) -> Option<Arc<QueuedConnection>> {
        self.inner.get(origin)
    }
}

impl ConnectionFactory for CountingFactory {
    fn create(&self, origin: &str) -> sessionmux::Result<Arc<dyn ConnectionHandle>> {
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(SessionError::ChannelSend("resources exhausted".into()));
        }

        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.create(origin)
    }
}

/// Registry backed by a [`CountingFactory`]
pub fn counting_registry() -> (Arc<ConnectionRegistry>, Arc<CountingFactory>) {
    let factory = CountingFactory::new();
    let registry = Arc::new(ConnectionRegistry::with_factory(factory.clone()));
    (registry, factory)
}

/// Registry whose factory fails `n` times before succeeding
pub fn failing_registry(n: usize) -> (Arc<ConnectionRegistry>, Arc<CountingFactory>) {
    let factory = CountingFactory::failing(n);
    let registry = Arc::new(ConnectionRegistry::with_factory(factory.clone()));
    (registry, factory)
}

pub fn sink() -> Arc<dyn EventSink> {
    RecordingSink::new()
}

pub fn addr(input: &str) -> Address {
    Address::parse(input).unwrap()
}
