//! Radio driver capability surface and inbound event schema

use std::fmt;

use async_trait::async_trait;
use smallvec::SmallVec;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::TransportError;
use crate::gatt::{CharacteristicHandle, Service};
use crate::radio::RadioState;

// ----------------------------------------------------------------------------
// Identities
// ----------------------------------------------------------------------------

/// Identity of a remote central issuing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Central(Uuid);

impl Central {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for Central {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-minted token tying a response to its inbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Command Surface
// ----------------------------------------------------------------------------

/// Coarse ATT status carried by read and write responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttStatus {
    Success,
    RequestNotSupported,
    UnlikelyError,
}

/// Payload of a single advertise command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    /// Top-level service identifiers, in registration order
    pub service_uuids: SmallVec<[Uuid; 4]>,
    /// Optional local device name shown to scanning centrals
    pub local_name: Option<String>,
}

/// Capability surface of the underlying radio driver.
///
/// Implementations perform the actual over-the-air work; the host only
/// sequences commands against them. Commands are best-effort from the
/// host's perspective: failures are logged and the session continues.
#[async_trait]
pub trait Transport: Send {
    /// Register the given services with the radio stack
    async fn register_services(&mut self, services: &[Service]) -> Result<(), TransportError>;

    /// Drop every previously registered service
    async fn clear_services(&mut self) -> Result<(), TransportError>;

    /// Begin advertising
    async fn advertise(&mut self, advertisement: Advertisement) -> Result<(), TransportError>;

    /// Stop advertising; a no-op when not advertising
    async fn stop_advertise(&mut self) -> Result<(), TransportError>;

    /// Answer a read request. `data` accompanies [`AttStatus::Success`] only.
    async fn respond_to_read(
        &mut self,
        request_id: RequestId,
        status: AttStatus,
        data: Option<Vec<u8>>,
    ) -> Result<(), TransportError>;

    /// Answer a write batch
    async fn respond_to_write(
        &mut self,
        request_id: RequestId,
        status: AttStatus,
    ) -> Result<(), TransportError>;
}

// ----------------------------------------------------------------------------
// Event Surface
// ----------------------------------------------------------------------------

/// One entry of an inbound write batch
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub central: Central,
    pub handle: CharacteristicHandle,
    /// Absent when the central sent no value; such entries are skipped
    pub payload: Option<Vec<u8>>,
    pub request_id: RequestId,
}

/// Events delivered by the transport, in radio delivery order
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The radio's power/availability state changed
    StateChanged(RadioState),
    /// A central requests the current value of a characteristic
    ReadRequest {
        central: Central,
        handle: CharacteristicHandle,
        request_id: RequestId,
    },
    /// A central wrote one or more characteristic values; answered with a
    /// single aggregated response
    WriteRequests(Vec<WriteRequest>),
    /// The OS recreated the radio stack and is restoring these services
    WillRestore { services: Vec<Uuid> },
    /// Confirmation (or failure) of a previously issued advertise command
    AdvertisingStarted { error: Option<String> },
}

// ----------------------------------------------------------------------------
// Event Channel
// ----------------------------------------------------------------------------

pub type EventSender = mpsc::UnboundedSender<TransportEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<TransportEvent>;

/// Channel pair wiring a transport driver to
/// [`PeripheralHost::run`](crate::PeripheralHost::run). Unbounded so radio
/// callbacks never block on the host.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
