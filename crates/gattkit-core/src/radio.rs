//! Radio power-state tracking and advertising control

use std::fmt;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::host::PeripheralHost;
use crate::transport::{Advertisement, Transport};

// ----------------------------------------------------------------------------
// Radio State
// ----------------------------------------------------------------------------

/// Power/availability state reported by the radio transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioState {
    Unknown,
    Resetting,
    Unsupported,
    Unauthorized,
    PoweredOff,
    PoweredOn,
}

impl RadioState {
    /// Only a fully operational radio counts as ready; every other state
    /// lands in the not-ready bucket.
    pub fn is_powered_on(self) -> bool {
        self == RadioState::PoweredOn
    }
}

impl fmt::Display for RadioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RadioState::Unknown => "unknown",
            RadioState::Resetting => "resetting",
            RadioState::Unsupported => "unsupported",
            RadioState::Unauthorized => "unauthorized",
            RadioState::PoweredOff => "powered-off",
            RadioState::PoweredOn => "powered-on",
        };
        f.write_str(name)
    }
}

// ----------------------------------------------------------------------------
// Radio State Tracking
// ----------------------------------------------------------------------------

impl<T: Transport> PeripheralHost<T> {
    /// Request advertising. Takes effect immediately if the radio is
    /// ready, otherwise as soon as the transport reports it powered on.
    /// Best-effort: transport failures are logged, not returned.
    pub async fn start(&mut self) {
        self.session.set_started(true);
        self.refresh_advertising().await;
    }

    /// Withdraw the advertising request and stop any active
    /// advertisement. Safe to call when not advertising.
    pub async fn stop(&mut self) {
        self.session.set_started(false);
        if let Err(err) = self.transport.stop_advertise().await {
            warn!("failed to stop advertising: {err}");
        }
    }

    /// Re-evaluate the advertising invariant after a reported radio state
    /// transition. Repeated powered-on reports refresh again; the radio
    /// may have recycled without passing through an off state.
    pub(crate) async fn handle_state_changed(&mut self, state: RadioState) {
        info!(%state, "radio state changed");
        self.session.set_radio_ready(state.is_powered_on());
        if state.is_powered_on() && self.session.started() {
            self.refresh_advertising().await;
        }
    }

    /// The OS recreated the radio stack underneath us. Registrations are
    /// re-established by the next powered-on transition, so this is
    /// observational only; no state is merged.
    pub(crate) fn handle_will_restore(&mut self, services: Vec<Uuid>) {
        info!(
            restored = services.len(),
            "transport restoring peripheral state"
        );
    }

    /// Clear stale registrations, re-register every service, then
    /// advertise the full identifier set. The advertise command is only
    /// issued once registration completed, so centrals never see
    /// identifiers that are not yet backed by a registered service.
    async fn refresh_advertising(&mut self) {
        if !self.session.radio_ready() {
            return;
        }

        // A fresh radio cycle invalidates earlier registrations.
        if let Err(err) = self.transport.clear_services().await {
            warn!("failed to clear stale services: {err}");
        }
        if let Err(err) = self
            .transport
            .register_services(self.session.services())
            .await
        {
            warn!("service registration failed, not advertising: {err}");
            return;
        }

        let advertisement = Advertisement {
            service_uuids: self.session.table().service_uuids(),
            local_name: self.config.local_name.clone(),
        };
        let count = advertisement.service_uuids.len();
        match self.transport.advertise(advertisement).await {
            Ok(()) => debug!(services = count, "advertising refreshed"),
            Err(err) => warn!("failed to start advertising: {err}"),
        }
    }
}
