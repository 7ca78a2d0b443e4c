//! Inbound request dispatch

use tracing::{debug, trace, warn};

use crate::error::DispatchError;
use crate::gatt::CharacteristicHandle;
use crate::host::PeripheralHost;
use crate::transport::{AttStatus, Central, RequestId, Transport, WriteRequest};

// ----------------------------------------------------------------------------
// Request Dispatch
// ----------------------------------------------------------------------------

impl<T: Transport> PeripheralHost<T> {
    /// Answer a single read request. Exactly one response is sent per
    /// request; a second response for the same id would be a protocol
    /// violation.
    pub(crate) async fn handle_read(
        &mut self,
        central: Central,
        handle: CharacteristicHandle,
        request_id: RequestId,
    ) {
        let (status, data) = match self.read_outcome(&central, &handle) {
            Ok(data) => (AttStatus::Success, Some(data)),
            Err(err) => {
                debug!(%central, %request_id, "read dispatch failed: {err}");
                (err.status(), None)
            }
        };

        if let Err(err) = self
            .transport
            .respond_to_read(request_id, status, data)
            .await
        {
            warn!(%request_id, "failed to respond to read: {err}");
        }
    }

    fn read_outcome(
        &self,
        central: &Central,
        handle: &CharacteristicHandle,
    ) -> Result<Vec<u8>, DispatchError> {
        let characteristic = self
            .session
            .table()
            .resolve(handle)
            .ok_or(DispatchError::UnresolvedCharacteristic)?;
        let on_read = self
            .session
            .on_read()
            .ok_or(DispatchError::NoHandlerBound)?;
        (*on_read)(central, characteristic).ok_or(DispatchError::HandlerDeclinedRead)
    }

    /// Answer a write batch with a single aggregated response, addressed
    /// to the first entry. The batch succeeds if any entry's handler
    /// accepted its write. An empty batch produces no response.
    pub(crate) async fn handle_write(&mut self, requests: Vec<WriteRequest>) {
        let Some(first) = requests.first() else {
            debug!("ignoring empty write batch");
            return;
        };
        let respond_to = first.request_id;

        let mut accepted = false;
        for request in &requests {
            let Some(characteristic) = self.session.table().resolve(&request.handle) else {
                debug!(
                    central = %request.central,
                    "skipping write: {}",
                    DispatchError::UnresolvedCharacteristic
                );
                continue;
            };
            let Some(on_write) = self.session.on_write() else {
                debug!(
                    central = %request.central,
                    "skipping write: {}",
                    DispatchError::NoHandlerBound
                );
                continue;
            };
            let Some(payload) = request.payload.as_deref() else {
                debug!(central = %request.central, "skipping write without payload");
                continue;
            };
            trace!(
                central = %request.central,
                len = payload.len(),
                payload = %hex::encode(payload),
                "dispatching write"
            );
            if (*on_write)(&request.central, characteristic, payload) {
                accepted = true;
            }
        }

        let status = if accepted {
            AttStatus::Success
        } else {
            debug!(
                request_id = %respond_to,
                "write batch rejected: {}",
                DispatchError::AggregateWriteFailure
            );
            AttStatus::UnlikelyError
        };

        if let Err(err) = self.transport.respond_to_write(respond_to, status).await {
            warn!(request_id = %respond_to, "failed to respond to write batch: {err}");
        }
    }
}
