//! GATT service and characteristic definitions

use smallvec::SmallVec;
use uuid::Uuid;

// ----------------------------------------------------------------------------
// Characteristic Definitions
// ----------------------------------------------------------------------------

/// A single GATT characteristic hosted by this peripheral
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    uuid: Uuid,
    service_uuid: Uuid,
    readable: bool,
    writable: bool,
}

impl Characteristic {
    /// Create a read-only characteristic
    pub fn readable(uuid: Uuid) -> Self {
        Self {
            uuid,
            service_uuid: Uuid::nil(),
            readable: true,
            writable: false,
        }
    }

    /// Create a write-only characteristic
    pub fn writable(uuid: Uuid) -> Self {
        Self {
            uuid,
            service_uuid: Uuid::nil(),
            readable: false,
            writable: true,
        }
    }

    /// Create a characteristic supporting both reads and writes
    pub fn read_write(uuid: Uuid) -> Self {
        Self {
            uuid,
            service_uuid: Uuid::nil(),
            readable: true,
            writable: true,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// UUID of the owning service, assigned when the characteristic is
    /// attached to a [`Service`]. Nil until then.
    pub fn service_uuid(&self) -> Uuid {
        self.service_uuid
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Transport-level handle identifying this characteristic
    pub fn handle(&self) -> CharacteristicHandle {
        CharacteristicHandle {
            service: self.service_uuid,
            characteristic: self.uuid,
        }
    }
}

/// A GATT service: an identifier plus an ordered set of characteristics.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    uuid: Uuid,
    characteristics: Vec<Characteristic>,
}

impl Service {
    /// Create a service owning the given characteristics. Each
    /// characteristic is stamped with this service's UUID so transport
    /// handles resolve back to it.
    pub fn new(uuid: Uuid, characteristics: Vec<Characteristic>) -> Self {
        let characteristics = characteristics
            .into_iter()
            .map(|mut characteristic| {
                characteristic.service_uuid = uuid;
                characteristic
            })
            .collect();
        Self {
            uuid,
            characteristics,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }
}

// ----------------------------------------------------------------------------
// Identity Lookup
// ----------------------------------------------------------------------------

/// The transport's raw identification of a characteristic: the owning
/// service UUID plus the characteristic UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacteristicHandle {
    pub service: Uuid,
    pub characteristic: Uuid,
}

/// Ordered registry of the services hosted by one session
#[derive(Debug, Clone, Default)]
pub struct ServiceTable {
    services: Vec<Service>,
}

impl ServiceTable {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// Registered services, in registration order
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Resolve a transport handle to the registered characteristic, if
    /// any. Both halves of the handle must match.
    pub fn resolve(&self, handle: &CharacteristicHandle) -> Option<&Characteristic> {
        self.services
            .iter()
            .find(|service| service.uuid() == handle.service)?
            .characteristics()
            .iter()
            .find(|characteristic| characteristic.uuid() == handle.characteristic)
    }

    /// Top-level service identifiers, in registration order
    pub fn service_uuids(&self) -> SmallVec<[Uuid; 4]> {
        self.services.iter().map(Service::uuid).collect()
    }
}

impl From<Vec<Service>> for ServiceTable {
    fn from(services: Vec<Service>) -> Self {
        Self::new(services)
    }
}
