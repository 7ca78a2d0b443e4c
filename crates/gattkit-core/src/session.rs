//! Per-host session state

use std::sync::Arc;

use crate::gatt::{Characteristic, Service, ServiceTable};
use crate::transport::Central;

// ----------------------------------------------------------------------------
// Callback Slots
// ----------------------------------------------------------------------------

/// Application callback answering a read request. Returning `None`
/// declines the request; the central receives a generic failure status.
pub type ReadHandler = dyn Fn(&Central, &Characteristic) -> Option<Vec<u8>> + Send + Sync;

/// Application callback accepting or rejecting one write of a batch
pub type WriteHandler = dyn Fn(&Central, &Characteristic, &[u8]) -> bool + Send + Sync;

// ----------------------------------------------------------------------------
// Session State
// ----------------------------------------------------------------------------

/// State of one peripheral session: operator intent, observed radio
/// readiness, the service registry and the dispatch callback slots.
///
/// Owned by [`PeripheralHost`](crate::PeripheralHost) rather than held
/// globally, so tests can run any number of independent sessions.
pub(crate) struct PeripheralSession {
    started: bool,
    radio_ready: bool,
    table: ServiceTable,
    on_read: Option<Arc<ReadHandler>>,
    on_write: Option<Arc<WriteHandler>>,
}

impl PeripheralSession {
    pub(crate) fn new(services: Vec<Service>) -> Self {
        Self {
            started: false,
            radio_ready: false,
            table: ServiceTable::new(services),
            on_read: None,
            on_write: None,
        }
    }

    /// Operator intent: advertising has been requested
    pub(crate) fn started(&self) -> bool {
        self.started
    }

    pub(crate) fn set_started(&mut self, started: bool) {
        self.started = started;
    }

    /// Whether the transport last reported a powered-on radio
    pub(crate) fn radio_ready(&self) -> bool {
        self.radio_ready
    }

    pub(crate) fn set_radio_ready(&mut self, ready: bool) {
        self.radio_ready = ready;
    }

    pub(crate) fn table(&self) -> &ServiceTable {
        &self.table
    }

    pub(crate) fn services(&self) -> &[Service] {
        self.table.services()
    }

    /// Last write wins; requests already dispatched keep the handler they
    /// were snapshotted with.
    pub(crate) fn bind_on_read(&mut self, handler: Arc<ReadHandler>) {
        self.on_read = Some(handler);
    }

    pub(crate) fn bind_on_write(&mut self, handler: Arc<WriteHandler>) {
        self.on_write = Some(handler);
    }

    /// Snapshot of the read handler, taken at dispatch time
    pub(crate) fn on_read(&self) -> Option<Arc<ReadHandler>> {
        self.on_read.clone()
    }

    /// Snapshot of the write handler, taken at dispatch time
    pub(crate) fn on_write(&self) -> Option<Arc<WriteHandler>> {
        self.on_write.clone()
    }
}
