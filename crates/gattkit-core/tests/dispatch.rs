//! Read/write dispatch tests driving a host over the loopback transport

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gattkit_core::{
    AttStatus, Central, Characteristic, CharacteristicHandle, PeripheralHost, Service,
    TransportEvent,
};
use gattkit_loopback::{LoopbackLink, LoopbackTransport};
use uuid::Uuid;

const SVC: Uuid = Uuid::from_u128(0xC000);
const CH_READ: Uuid = Uuid::from_u128(0xC001);
const CH_WRITE: Uuid = Uuid::from_u128(0xC002);

fn handle(characteristic: Uuid) -> CharacteristicHandle {
    CharacteristicHandle {
        service: SVC,
        characteristic,
    }
}

fn dispatch_host() -> (PeripheralHost<LoopbackTransport>, LoopbackLink, Central) {
    let services = vec![Service::new(
        SVC,
        vec![
            Characteristic::readable(CH_READ),
            Characteristic::writable(CH_WRITE),
        ],
    )];
    let (transport, link) = LoopbackTransport::new();
    let host = PeripheralHost::new(transport, services);
    (host, link, Central::new(Uuid::new_v4()))
}

// ----------------------------------------------------------------------------
// Read Path
// ----------------------------------------------------------------------------

#[tokio::test]
async fn read_returns_handler_bytes_on_success() {
    let (mut host, link, central) = dispatch_host();
    host.set_on_read(|_, _| Some(vec![1, 2, 3]));

    let (request_id, event) = link.read_request(central, handle(CH_READ));
    host.handle_event(event).await;

    let responses = link.read_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].request_id, request_id);
    assert_eq!(responses[0].status, AttStatus::Success);
    assert_eq!(responses[0].data.as_deref(), Some(&[1, 2, 3][..]));
}

#[tokio::test]
async fn read_handler_sees_the_resolved_characteristic_and_central() {
    let (mut host, link, central) = dispatch_host();
    let expected_central = central;
    host.set_on_read(move |central, characteristic| {
        assert_eq!(*central, expected_central);
        assert_eq!(characteristic.service_uuid(), SVC);
        Some(characteristic.uuid().into_bytes().to_vec())
    });

    let (_, event) = link.read_request(central, handle(CH_READ));
    host.handle_event(event).await;

    let responses = link.read_responses();
    assert_eq!(
        responses[0].data.as_deref(),
        Some(&CH_READ.into_bytes()[..])
    );
}

#[tokio::test]
async fn read_of_unknown_handle_is_not_supported_and_skips_the_handler() {
    let (mut host, link, central) = dispatch_host();
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    host.set_on_read(move |_, _| {
        counted.fetch_add(1, Ordering::SeqCst);
        Some(vec![0])
    });

    let unknown = CharacteristicHandle {
        service: SVC,
        characteristic: Uuid::from_u128(0xDEAD),
    };
    let (request_id, event) = link.read_request(central, unknown);
    host.handle_event(event).await;

    let responses = link.read_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].request_id, request_id);
    assert_eq!(responses[0].status, AttStatus::RequestNotSupported);
    assert!(responses[0].data.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn read_without_a_bound_handler_is_not_supported() {
    let (mut host, link, central) = dispatch_host();

    let (_, event) = link.read_request(central, handle(CH_READ));
    host.handle_event(event).await;

    let responses = link.read_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].status, AttStatus::RequestNotSupported);
}

#[tokio::test]
async fn declined_read_yields_exactly_one_failure_response() {
    let (mut host, link, central) = dispatch_host();
    host.set_on_read(|_, _| None);

    let (request_id, event) = link.read_request(central, handle(CH_READ));
    host.handle_event(event).await;

    // One response only: declining must not produce a second response.
    let responses = link.read_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].request_id, request_id);
    assert_eq!(responses[0].status, AttStatus::UnlikelyError);
    assert!(responses[0].data.is_none());
}

#[tokio::test]
async fn rebinding_read_handler_affects_subsequent_requests_only() {
    let (mut host, link, central) = dispatch_host();

    host.set_on_read(|_, _| Some(b"one".to_vec()));
    let (_, event) = link.read_request(central, handle(CH_READ));
    host.handle_event(event).await;

    host.set_on_read(|_, _| Some(b"two".to_vec()));
    let (_, event) = link.read_request(central, handle(CH_READ));
    host.handle_event(event).await;

    let responses = link.read_responses();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].data.as_deref(), Some(&b"one"[..]));
    assert_eq!(responses[1].data.as_deref(), Some(&b"two"[..]));
}

// ----------------------------------------------------------------------------
// Write Path
// ----------------------------------------------------------------------------

#[tokio::test]
async fn write_batch_succeeds_when_any_entry_is_accepted() {
    let (mut host, link, central) = dispatch_host();
    host.set_on_write(|_, _, payload| payload == [2]);

    let (ids, event) = link.write_batch(vec![
        (central, handle(CH_WRITE), Some(vec![1])),
        (central, handle(CH_WRITE), Some(vec![2])),
        (central, handle(CH_WRITE), Some(vec![3])),
    ]);
    host.handle_event(event).await;

    // A single response, addressed to the first entry of the batch.
    let responses = link.write_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].0, ids[0]);
    assert_eq!(responses[0].1, AttStatus::Success);
}

#[tokio::test]
async fn write_batch_fails_when_every_entry_is_rejected() {
    let (mut host, link, central) = dispatch_host();
    host.set_on_write(|_, _, _| false);

    let (ids, event) = link.write_batch(vec![
        (central, handle(CH_WRITE), Some(vec![1])),
        (central, handle(CH_WRITE), Some(vec![2])),
        (central, handle(CH_WRITE), Some(vec![3])),
    ]);
    host.handle_event(event).await;

    let responses = link.write_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].0, ids[0]);
    assert_eq!(responses[0].1, AttStatus::UnlikelyError);
}

#[tokio::test]
async fn empty_write_batch_sends_no_response() {
    let (mut host, link, _) = dispatch_host();
    host.set_on_write(|_, _, _| true);

    host.handle_event(TransportEvent::WriteRequests(Vec::new()))
        .await;

    assert!(link.write_responses().is_empty());
}

#[tokio::test]
async fn skipped_write_entries_do_not_affect_the_aggregate() {
    let (mut host, link, central) = dispatch_host();
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    host.set_on_write(move |_, _, _| {
        counted.fetch_add(1, Ordering::SeqCst);
        true
    });

    let unknown = CharacteristicHandle {
        service: SVC,
        characteristic: Uuid::from_u128(0xDEAD),
    };
    let (ids, event) = link.write_batch(vec![
        (central, unknown, Some(vec![1])),
        (central, handle(CH_WRITE), None),
        (central, handle(CH_WRITE), Some(vec![3])),
    ]);
    host.handle_event(event).await;

    // Only the well-formed entry reached the handler; the batch still
    // succeeds and the response is addressed to the first entry.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let responses = link.write_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].0, ids[0]);
    assert_eq!(responses[0].1, AttStatus::Success);
}

#[tokio::test]
async fn write_batch_without_a_bound_handler_fails_once() {
    let (mut host, link, central) = dispatch_host();

    let (ids, event) = link.write_batch(vec![(central, handle(CH_WRITE), Some(vec![1]))]);
    host.handle_event(event).await;

    let responses = link.write_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].0, ids[0]);
    assert_eq!(responses[0].1, AttStatus::UnlikelyError);
}

#[tokio::test]
async fn write_handler_receives_the_payload_bytes() {
    let (mut host, link, central) = dispatch_host();
    host.set_on_write(|_, characteristic, payload| {
        assert_eq!(characteristic.uuid(), CH_WRITE);
        payload == [0xAB, 0xCD]
    });

    let (_, event) = link.write_batch(vec![(central, handle(CH_WRITE), Some(vec![0xAB, 0xCD]))]);
    host.handle_event(event).await;

    assert_eq!(link.write_responses()[0].1, AttStatus::Success);
}

// ----------------------------------------------------------------------------
// Fluent Binding
// ----------------------------------------------------------------------------

#[tokio::test]
async fn callback_setters_chain() {
    let (mut host, link, central) = dispatch_host();
    host.set_on_read(|_, _| Some(vec![9]))
        .set_on_write(|_, _, _| true);

    let (_, read) = link.read_request(central, handle(CH_READ));
    host.handle_event(read).await;
    let (_, write) = link.write_batch(vec![(central, handle(CH_WRITE), Some(vec![0]))]);
    host.handle_event(write).await;

    assert_eq!(link.read_responses()[0].status, AttStatus::Success);
    assert_eq!(link.write_responses()[0].1, AttStatus::Success);
}
