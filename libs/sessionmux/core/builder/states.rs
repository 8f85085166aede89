//! Type-state markers for the session builder
//!
//! These types record at compile time which identity halves have been
//! given to the builder, so neither can be given twice.

use std::marker::PhantomData;

/// Marker trait for address state
pub trait AddressState {}

/// Address has not been set
pub struct NoAddress;
impl AddressState for NoAddress {}

/// Address has been set
pub struct HasAddress;
impl AddressState for HasAddress {}

/// Marker trait for callback state
pub trait SinkState {}

/// Callback has not been set
pub struct NoSink;
impl SinkState for NoSink {}

/// Callback has been set
pub struct HasSink;
impl SinkState for HasSink {}

/// Phantom marker to prevent direct construction
#[derive(Debug, Clone, Copy)]
pub struct TypeState<A, S> {
    _address: PhantomData<A>,
    _sink: PhantomData<S>,
}

impl<A, S> TypeState<A, S> {
    pub(crate) fn new() -> Self {
        Self {
            _address: PhantomData,
            _sink: PhantomData,
        }
    }
}

impl<A, S> Default for TypeState<A, S> {
    fn default() -> Self {
        Self::new()
    }
}
