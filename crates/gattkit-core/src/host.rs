//! Peripheral host: public API surface and event routing

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::gatt::{Characteristic, Service};
use crate::session::PeripheralSession;
use crate::transport::{Central, EventReceiver, Transport, TransportEvent};

// ----------------------------------------------------------------------------
// Peripheral Host
// ----------------------------------------------------------------------------

/// A BLE peripheral-role GATT service host.
///
/// Owns the transport command handle and the session state, keeps the
/// advertising invariant satisfied (advertise exactly while advertising
/// is requested *and* the radio is ready) and dispatches inbound requests
/// to the bound application callbacks.
pub struct PeripheralHost<T: Transport> {
    pub(crate) transport: T,
    pub(crate) session: PeripheralSession,
    pub(crate) config: HostConfig,
}

impl<T: Transport> PeripheralHost<T> {
    /// Create a host advertising the given services once started. The
    /// service list is fixed for the session lifetime.
    pub fn new(transport: T, services: Vec<Service>) -> Self {
        Self::with_config(transport, services, HostConfig::default())
    }

    /// Create a host with explicit configuration
    pub fn with_config(transport: T, services: Vec<Service>, config: HostConfig) -> Self {
        Self {
            transport,
            session: PeripheralSession::new(services),
            config,
        }
    }

    /// Bind the read callback. Replaces any previous binding for all
    /// subsequent requests; a request already dispatched keeps the
    /// callback it started with.
    pub fn set_on_read<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Central, &Characteristic) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        self.session.bind_on_read(Arc::new(callback));
        self
    }

    /// Bind the write callback. Replaces any previous binding.
    pub fn set_on_write<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Central, &Characteristic, &[u8]) -> bool + Send + Sync + 'static,
    {
        self.session.bind_on_write(Arc::new(callback));
        self
    }

    /// Whether advertising has been requested via [`start`](Self::start)
    pub fn is_started(&self) -> bool {
        self.session.started()
    }

    /// Whether the transport last reported a powered-on radio
    pub fn is_radio_ready(&self) -> bool {
        self.session.radio_ready()
    }

    /// Services hosted by this session, in registration order
    pub fn services(&self) -> &[Service] {
        self.session.services()
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Process one transport event. Events must arrive in radio delivery
    /// order; drivers already running on a serial dispatch queue call
    /// this directly instead of going through [`run`](Self::run).
    pub async fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::StateChanged(state) => self.handle_state_changed(state).await,
            TransportEvent::ReadRequest {
                central,
                handle,
                request_id,
            } => self.handle_read(central, handle, request_id).await,
            TransportEvent::WriteRequests(requests) => self.handle_write(requests).await,
            TransportEvent::WillRestore { services } => self.handle_will_restore(services),
            TransportEvent::AdvertisingStarted { error: None } => {
                debug!("advertising start confirmed");
            }
            TransportEvent::AdvertisingStarted {
                error: Some(reason),
            } => {
                warn!("advertising failed to start: {reason}");
            }
        }
    }

    /// Drain transport events until the channel closes
    pub async fn run(&mut self, mut events: EventReceiver) {
        info!("peripheral host event loop starting");

        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }

        info!("event channel closed, peripheral host shutting down");
    }
}
