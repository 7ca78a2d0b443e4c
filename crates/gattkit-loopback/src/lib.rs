//! In-process loopback transport for gattkit
//!
//! Implements the [`Transport`] trait against a simulated radio link so a
//! [`PeripheralHost`](gattkit_core::PeripheralHost) can be exercised
//! deterministically without radio hardware. The [`LoopbackLink`] handle
//! shares the simulated link state: it flips the radio power state,
//! fabricates read/write requests as a connected central would issue
//! them, and exposes every command the host sent for inspection.
//!
//! Power transitions behave like a real radio cycle: leaving the
//! powered-on state drops the active advertisement and every service
//! registration, and commands that need a powered radio fail with
//! [`TransportError::AdapterUnavailable`] until power returns.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use gattkit_core::{
    Advertisement, AttStatus, Central, CharacteristicHandle, RadioState, RequestId, Service,
    Transport, TransportError, TransportEvent, WriteRequest,
};

// ----------------------------------------------------------------------------
// Simulated Link State
// ----------------------------------------------------------------------------

/// A recorded response to a read request
#[derive(Debug, Clone)]
pub struct ReadResponse {
    pub request_id: RequestId,
    pub status: AttStatus,
    pub data: Option<Vec<u8>>,
}

struct LinkState {
    power: RadioState,
    registered: Vec<Service>,
    advertisement: Option<Advertisement>,
    register_calls: usize,
    clear_calls: usize,
    advertise_calls: usize,
    stop_calls: usize,
    read_responses: Vec<ReadResponse>,
    write_responses: Vec<(RequestId, AttStatus)>,
    next_request: u64,
}

impl LinkState {
    fn new() -> Self {
        Self {
            power: RadioState::Unknown,
            registered: Vec::new(),
            advertisement: None,
            register_calls: 0,
            clear_calls: 0,
            advertise_calls: 0,
            stop_calls: 0,
            read_responses: Vec::new(),
            write_responses: Vec::new(),
            next_request: 0,
        }
    }
}

// ----------------------------------------------------------------------------
// Transport Side
// ----------------------------------------------------------------------------

/// Command side of the simulated link, handed to the host
pub struct LoopbackTransport {
    state: Arc<Mutex<LinkState>>,
}

impl LoopbackTransport {
    /// Create a transport plus the link handle observing it
    pub fn new() -> (LoopbackTransport, LoopbackLink) {
        let state = Arc::new(Mutex::new(LinkState::new()));
        (
            LoopbackTransport {
                state: state.clone(),
            },
            LoopbackLink { state },
        )
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn register_services(&mut self, services: &[Service]) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if !state.power.is_powered_on() {
            return Err(TransportError::AdapterUnavailable);
        }
        state.register_calls += 1;
        state.registered = services.to_vec();
        Ok(())
    }

    async fn clear_services(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if !state.power.is_powered_on() {
            return Err(TransportError::AdapterUnavailable);
        }
        state.clear_calls += 1;
        state.registered.clear();
        Ok(())
    }

    async fn advertise(&mut self, advertisement: Advertisement) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if !state.power.is_powered_on() {
            return Err(TransportError::AdapterUnavailable);
        }
        state.advertise_calls += 1;
        state.advertisement = Some(advertisement);
        Ok(())
    }

    async fn stop_advertise(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.stop_calls += 1;
        state.advertisement = None;
        Ok(())
    }

    async fn respond_to_read(
        &mut self,
        request_id: RequestId,
        status: AttStatus,
        data: Option<Vec<u8>>,
    ) -> Result<(), TransportError> {
        self.state.lock().read_responses.push(ReadResponse {
            request_id,
            status,
            data,
        });
        Ok(())
    }

    async fn respond_to_write(
        &mut self,
        request_id: RequestId,
        status: AttStatus,
    ) -> Result<(), TransportError> {
        self.state.lock().write_responses.push((request_id, status));
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Link Handle
// ----------------------------------------------------------------------------

/// Stimulus and inspection side of the simulated link, kept by the test
/// or embedding application
#[derive(Clone)]
pub struct LoopbackLink {
    state: Arc<Mutex<LinkState>>,
}

impl LoopbackLink {
    /// Flip the simulated radio power state and return the matching event
    /// to feed to the host. Leaving the powered-on state drops the active
    /// advertisement and every registration, as a real radio cycle would.
    pub fn set_power(&self, power: RadioState) -> TransportEvent {
        let mut state = self.state.lock();
        state.power = power;
        if !power.is_powered_on() {
            state.advertisement = None;
            state.registered.clear();
        }
        debug!(%power, "loopback radio state set");
        TransportEvent::StateChanged(power)
    }

    /// Fabricate a read request from `central`, minting a fresh request id
    pub fn read_request(
        &self,
        central: Central,
        handle: CharacteristicHandle,
    ) -> (RequestId, TransportEvent) {
        let request_id = self.mint_request_id();
        (
            request_id,
            TransportEvent::ReadRequest {
                central,
                handle,
                request_id,
            },
        )
    }

    /// Fabricate a write batch; each entry receives its own request id,
    /// returned in batch order
    pub fn write_batch(
        &self,
        entries: Vec<(Central, CharacteristicHandle, Option<Vec<u8>>)>,
    ) -> (Vec<RequestId>, TransportEvent) {
        let mut ids = Vec::with_capacity(entries.len());
        let requests = entries
            .into_iter()
            .map(|(central, handle, payload)| {
                let request_id = self.mint_request_id();
                ids.push(request_id);
                WriteRequest {
                    central,
                    handle,
                    payload,
                    request_id,
                }
            })
            .collect();
        (ids, TransportEvent::WriteRequests(requests))
    }

    /// Simulated OS restoration notice carrying the given service
    /// identifiers
    pub fn restore_notice(&self, services: Vec<Uuid>) -> TransportEvent {
        TransportEvent::WillRestore { services }
    }

    /// Confirmation event for a previously issued advertise command
    pub fn advertising_started(&self, error: Option<String>) -> TransportEvent {
        TransportEvent::AdvertisingStarted { error }
    }

    /// Current simulated power state
    pub fn power(&self) -> RadioState {
        self.state.lock().power
    }

    /// Whether the simulated radio is currently advertising
    pub fn is_advertising(&self) -> bool {
        self.state.lock().advertisement.is_some()
    }

    /// The advertisement most recently accepted, if still active
    pub fn advertisement(&self) -> Option<Advertisement> {
        self.state.lock().advertisement.clone()
    }

    /// Services currently registered with the simulated radio
    pub fn registered_services(&self) -> Vec<Service> {
        self.state.lock().registered.clone()
    }

    pub fn register_calls(&self) -> usize {
        self.state.lock().register_calls
    }

    pub fn clear_calls(&self) -> usize {
        self.state.lock().clear_calls
    }

    pub fn advertise_calls(&self) -> usize {
        self.state.lock().advertise_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.state.lock().stop_calls
    }

    /// Responses sent for read requests, oldest first
    pub fn read_responses(&self) -> Vec<ReadResponse> {
        self.state.lock().read_responses.clone()
    }

    /// Responses sent for write batches, oldest first
    pub fn write_responses(&self) -> Vec<(RequestId, AttStatus)> {
        self.state.lock().write_responses.clone()
    }

    fn mint_request_id(&self) -> RequestId {
        let mut state = self.state.lock();
        state.next_request += 1;
        RequestId::new(state.next_request)
    }
}
