//! End-to-end smoke tests for the full hmipbridged stack.
//!
//! Each test wires the real accessory host, bridge service, sync loop step
//! and axum router around stub vendor ports, then exercises the HTTP layer
//! via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hmipbridge_adapter_http_axum::router;
use hmipbridge_adapter_http_axum::state::AppState;
use hmipbridge_app::accessory_host::InMemoryAccessoryHost;
use hmipbridge_app::ports::{StateSource, SwitchControl};
use hmipbridge_app::services::bridge_service::BridgeService;
use hmipbridge_app::sync_loop;
use hmipbridge_domain::accessory::{Characteristic, CharacteristicValue};
use hmipbridge_domain::command::SwitchStateCommand;
use hmipbridge_domain::device::HomeSnapshot;
use hmipbridge_domain::error::BridgeError;

/// Records every switch command it receives.
#[derive(Clone, Default)]
struct RecordingControl {
    commands: Arc<Mutex<Vec<SwitchStateCommand>>>,
}

impl SwitchControl for RecordingControl {
    async fn set_switch_state(&self, command: SwitchStateCommand) -> Result<(), BridgeError> {
        self.commands.lock().unwrap().push(command);
        Ok(())
    }
}

/// Serves a fixed `getCurrentState` payload.
struct FixedSource(serde_json::Value);

impl StateSource for FixedSource {
    async fn current_state(&self) -> Result<HomeSnapshot, BridgeError> {
        Ok(HomeSnapshot {
            devices: serde_json::from_value(self.0["devices"].clone()).unwrap(),
            groups: serde_json::from_value(self.0["groups"].clone()).unwrap(),
            ..HomeSnapshot::default()
        })
    }
}

fn home(on: bool, power: f64, energy: f64) -> serde_json::Value {
    serde_json::json!({
        "devices": {
            "3014F711A0000A9A4991B2F2": {
                "id": "3014F711A0000A9A4991B2F2",
                "label": "Washing machine",
                "type": "PLUGABLE_SWITCH_MEASURING",
                "modelType": "HMIP-PSM",
                "firmwareVersion": "1.4.8",
                "lastStatusUpdate": 1_700_000_000_000_i64,
                "functionalChannels": {
                    "0": {
                        "functionalChannelType": "DEVICE_BASE",
                        "index": 0,
                        "unreach": false
                    },
                    "1": {
                        "functionalChannelType": "SWITCH_MEASURING_CHANNEL",
                        "index": 1,
                        "on": on,
                        "currentPowerConsumption": power,
                        "energyCounter": energy
                    }
                }
            },
            "3014F711A0000A9A4991B2F3": {
                "id": "3014F711A0000A9A4991B2F3",
                "label": "Hallway contact",
                "type": "SHUTTER_CONTACT",
                "functionalChannels": {
                    "1": {"functionalChannelType": "SHUTTER_CONTACT_CHANNEL"}
                }
            }
        },
        "groups": {
            "G1": {"id": "G1", "label": "Laundry", "type": "META"}
        }
    })
}

struct Harness {
    host: Arc<InMemoryAccessoryHost>,
    bridge: Arc<BridgeService<Arc<InMemoryAccessoryHost>, RecordingControl>>,
    control: RecordingControl,
}

impl Harness {
    fn new() -> Self {
        let host = Arc::new(InMemoryAccessoryHost::new(64));
        let control = RecordingControl::default();
        let bridge = Arc::new(BridgeService::new(Arc::clone(&host), control.clone()));
        Self {
            host,
            bridge,
            control,
        }
    }

    fn app(&self) -> axum::Router {
        router::build(AppState::new(
            Arc::clone(&self.bridge),
            Arc::clone(&self.host),
        ))
    }

    async fn sync(&self, payload: serde_json::Value) {
        sync_loop::sync_once(&FixedSource(payload), &self.bridge)
            .await
            .unwrap();
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let harness = Harness::new();

    let resp = harness.app().oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Snapshot to API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_expose_only_measuring_switches() {
    let harness = Harness::new();
    harness.sync(home(true, 512.25, 10_240.0)).await;

    let resp = harness.app().oneshot(get("/api/accessories")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], "3014F711A0000A9A4991B2F2");
    assert_eq!(list[0]["name"], "Washing machine");
    assert_eq!(list[0]["on"], true);
    assert_eq!(list[0]["currentPowerConsumption"], 512.25);
    assert_eq!(list[0]["energyCounter"], 10_240.0);
    assert!(list[0]["lastReport"].is_string());
}

#[tokio::test]
async fn should_reflect_later_snapshots() {
    let harness = Harness::new();
    harness.sync(home(true, 512.25, 10_240.0)).await;
    harness.sync(home(false, 0.0, 10_250.5)).await;

    let resp = harness
        .app()
        .oneshot(get("/api/accessories/3014F711A0000A9A4991B2F2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["on"], false);
    assert_eq!(json["currentPowerConsumption"], 0.0);
    assert_eq!(json["energyCounter"], 10_250.5);
}

#[tokio::test]
async fn should_publish_accessory_information_to_host() {
    let harness = Harness::new();
    harness.sync(home(true, 1.0, 2.0)).await;

    let record = harness
        .host
        .get(&"3014F711A0000A9A4991B2F2".parse().unwrap())
        .unwrap();

    assert_eq!(record.descriptor.information.model, "HMIP-PSM");
    assert_eq!(
        record.value(Characteristic::FirmwareRevision),
        Some(&CharacteristicValue::from("1.4.8"))
    );
    assert_eq!(
        record.value(Characteristic::On),
        Some(&CharacteristicValue::Bool(true))
    );
}

#[tokio::test]
async fn should_drop_accessory_when_device_disappears() {
    let harness = Harness::new();
    harness.sync(home(true, 1.0, 2.0)).await;
    harness
        .sync(serde_json::json!({"devices": {}, "groups": {}}))
        .await;

    let resp = harness
        .app()
        .oneshot(get("/api/accessories/3014F711A0000A9A4991B2F2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(harness.host.list().is_empty());
}

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_forward_switch_request_to_vendor() {
    let harness = Harness::new();
    harness.sync(home(true, 512.25, 10_240.0)).await;

    let resp = harness
        .app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/accessories/3014F711A0000A9A4991B2F2/on")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"on":false}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let commands = harness.control.commands.lock().unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].channel_index, 1);
    assert!(!commands[0].on);
    assert_eq!(commands[0].device_id.as_str(), "3014F711A0000A9A4991B2F2");
}
