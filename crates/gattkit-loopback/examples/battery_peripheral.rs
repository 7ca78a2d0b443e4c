//! Minimal peripheral hosting a battery service over the loopback link.
//!
//! Run with: cargo run -p gattkit-loopback --example battery_peripheral

use gattkit_core::{Central, Characteristic, HostConfig, PeripheralHost, RadioState, Service};
use gattkit_loopback::LoopbackTransport;
use uuid::Uuid;

const BATTERY_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000180F_0000_1000_8000_00805F9B34FB);
const BATTERY_LEVEL_UUID: Uuid = Uuid::from_u128(0x00002A19_0000_1000_8000_00805F9B34FB);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let service = Service::new(
        BATTERY_SERVICE_UUID,
        vec![Characteristic::read_write(BATTERY_LEVEL_UUID)],
    );
    let battery_level = service.characteristics()[0].clone();

    let (transport, link) = LoopbackTransport::new();
    let config = HostConfig::new().with_local_name("gattkit-demo".to_string());
    let mut host = PeripheralHost::with_config(transport, vec![service], config);
    host.set_on_read(|central, characteristic| {
        println!("read of {} from {central}", characteristic.uuid());
        Some(vec![87])
    })
    .set_on_write(|central, characteristic, payload| {
        println!(
            "write of {payload:?} to {} from {central}",
            characteristic.uuid()
        );
        true
    });

    host.start().await;
    host.handle_event(link.set_power(RadioState::PoweredOn)).await;
    println!("advertising: {:?}", link.advertisement());

    let central = Central::new(Uuid::new_v4());

    let (_, read) = link.read_request(central, battery_level.handle());
    host.handle_event(read).await;
    for response in link.read_responses() {
        println!(
            "read response {}: {:?} {:?}",
            response.request_id, response.status, response.data
        );
    }

    let (_, write) = link.write_batch(vec![(central, battery_level.handle(), Some(vec![42]))]);
    host.handle_event(write).await;
    for (request_id, status) in link.write_responses() {
        println!("write response {request_id}: {status:?}");
    }

    host.stop().await;
    println!("advertising after stop: {}", link.is_advertising());
}
