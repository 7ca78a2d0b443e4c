//! BLE peripheral-role GATT service host
//!
//! This crate hosts one or more GATT services on a BLE radio in the
//! peripheral role: it keeps the services advertised while the radio is
//! available, and dispatches inbound characteristic read/write requests
//! from connected centrals to application-supplied handlers.
//!
//! The actual over-the-air work is delegated to a radio driver behind the
//! [`Transport`] trait. The host's job is the state machine in between:
//! the radio's power state changes independently of the application (the
//! OS can tear the stack down and recreate it mid-session), while GATT
//! clients expect a synchronous request/response contract. The host
//! reconciles the two and re-establishes advertising transparently after
//! every radio cycle.
//!
//! ## Architecture
//!
//! - `config` - Host configuration and settings
//! - `error` - Error types for transport commands and request dispatch
//! - `gatt` - Service and characteristic definitions plus the lookup table
//! - `session` - Per-host session state and callback slots
//! - `radio` - Radio power-state tracking and advertising control
//! - `dispatch` - Inbound read/write request dispatch
//! - `transport` - Radio driver capability trait and inbound event schema
//! - `host` - The public `PeripheralHost` surface tying it all together
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gattkit_core::{Characteristic, PeripheralHost, RadioState, Service};
//! use gattkit_loopback::LoopbackTransport;
//! use uuid::Uuid;
//!
//! # async fn example() {
//! let service = Service::new(
//!     Uuid::from_u128(0x0000180F_0000_1000_8000_00805F9B34FB),
//!     vec![Characteristic::readable(Uuid::from_u128(
//!         0x00002A19_0000_1000_8000_00805F9B34FB,
//!     ))],
//! );
//!
//! let (transport, link) = LoopbackTransport::new();
//! let mut host = PeripheralHost::new(transport, vec![service]);
//! host.set_on_read(|_central, _characteristic| Some(vec![98]));
//!
//! // Advertising begins once the radio reports itself powered on and
//! // reappears automatically after every radio cycle.
//! host.start().await;
//! host.handle_event(link.set_power(RadioState::PoweredOn)).await;
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod gatt;
mod host;
mod radio;
mod session;
mod transport;

// Public API exports
pub use config::HostConfig;
pub use error::{DispatchError, TransportError};
pub use gatt::{Characteristic, CharacteristicHandle, Service, ServiceTable};
pub use host::PeripheralHost;
pub use radio::RadioState;
pub use session::{ReadHandler, WriteHandler};
pub use transport::{
    event_channel, Advertisement, AttStatus, Central, EventReceiver, EventSender, RequestId,
    Transport, TransportEvent, WriteRequest,
};
