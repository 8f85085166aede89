//! Lock-free link state and counters for a shared connection

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Link status of a shared connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    Reconnecting = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Reconnecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// [`ConnectionState`] stored in a single atomic byte
#[derive(Debug)]
pub struct AtomicConnectionState {
    inner: AtomicU8,
}

impl AtomicConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self {
            inner: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: ConnectionState) {
        self.inner.store(state as u8, Ordering::Release);
    }

    /// Move to `to` only if the current state is `from`
    ///
    /// Returns `true` if the transition happened.
    pub fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.inner
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }

    /// Includes `Reconnecting`
    #[inline]
    pub fn is_connecting(&self) -> bool {
        matches!(
            self.get(),
            ConnectionState::Connecting | ConnectionState::Reconnecting
        )
    }

    #[inline]
    pub fn is_disconnected(&self) -> bool {
        self.get() == ConnectionState::Disconnected
    }
}

/// Counters kept by a connection
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    frames_queued: AtomicU64,
    events_dispatched: AtomicU64,
    reconnect_count: AtomicU64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_queued(&self) {
        self.frames_queued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_dispatched(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_reconnects(&self) {
        self.reconnect_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_queued(&self) -> u64 {
        self.frames_queued.load(Ordering::Relaxed)
    }

    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    pub fn reconnect_count(&self) -> u64 {
        self.reconnect_count.load(Ordering::Relaxed)
    }
}

/// Point-in-time copy of a connection's counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub frames_queued: u64,
    pub events_dispatched: u64,
    pub reconnect_count: u64,
    pub connection_state: ConnectionState,
}
