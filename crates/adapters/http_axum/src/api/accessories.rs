//! JSON REST handlers for bridged accessories.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hmipbridge_app::accessories::SwitchMeasuringAccessory;
use hmipbridge_app::accessory_host::AccessoryRecord;
use hmipbridge_app::ports::{AccessoryHandle, SwitchControl};
use hmipbridge_domain::accessory::{Characteristic, CharacteristicValue, ServiceKind};
use hmipbridge_domain::error::{BridgeError, NotFoundError};
use hmipbridge_domain::id::DeviceId;
use hmipbridge_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Cached view of one accessory.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryView {
    pub id: DeviceId,
    pub name: String,
    pub on: bool,
    pub current_power_consumption: f64,
    pub energy_counter: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_report: Option<Timestamp>,
}

impl<S, C> From<&SwitchMeasuringAccessory<S, C>> for AccessoryView
where
    S: AccessoryHandle,
    C: SwitchControl,
{
    fn from(accessory: &SwitchMeasuringAccessory<S, C>) -> Self {
        let state = accessory.state();
        Self {
            id: accessory.device_id().clone(),
            name: accessory.name().to_string(),
            on: state.on,
            current_power_consumption: state.current_power_consumption,
            energy_counter: state.energy_counter,
            last_report: accessory.last_report(),
        }
    }
}

/// One characteristic as exposed to the ecosystem.
#[derive(Debug, Serialize)]
pub struct CharacteristicView {
    #[serde(rename = "type")]
    pub kind: Characteristic,
    pub uuid: &'static str,
    pub writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub value: Option<CharacteristicValue>,
}

/// A service and the characteristics it groups.
#[derive(Debug, Serialize)]
pub struct ServiceView {
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub characteristics: Vec<CharacteristicView>,
}

impl ServiceView {
    /// Group the characteristics of a host record by service, skipping
    /// services with nothing to show.
    fn from_record(record: &AccessoryRecord) -> Vec<Self> {
        let mut characteristics: Vec<Characteristic> = record
            .descriptor
            .characteristics
            .iter()
            .copied()
            .chain(record.values.keys().copied())
            .collect();
        characteristics.sort_unstable();
        characteristics.dedup();

        [ServiceKind::AccessoryInformation, ServiceKind::Switch]
            .into_iter()
            .filter_map(|kind| {
                let characteristics: Vec<_> = characteristics
                    .iter()
                    .filter(|characteristic| characteristic.service() == kind)
                    .map(|&characteristic| CharacteristicView {
                        kind: characteristic,
                        uuid: characteristic.uuid(),
                        writable: characteristic.is_writable(),
                        unit: characteristic.unit(),
                        value: record.value(characteristic).cloned(),
                    })
                    .collect();
                (!characteristics.is_empty()).then_some(Self {
                    kind,
                    characteristics,
                })
            })
            .collect()
    }
}

/// Cached view of one accessory with its services.
#[derive(Debug, Serialize)]
pub struct AccessoryDetail {
    #[serde(flatten)]
    pub accessory: AccessoryView,
    pub services: Vec<ServiceView>,
}

/// Request body for switching an accessory.
#[derive(Deserialize)]
pub struct SetOnRequest {
    pub on: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AccessoryView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<AccessoryDetail>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the set-on endpoint.
pub enum SetOnResponse {
    NoContent,
}

impl IntoResponse for SetOnResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(id: &str) -> Result<DeviceId, ApiError> {
    DeviceId::from_str(id).map_err(|err| ApiError::from(BridgeError::Validation(err)))
}

/// `GET /api/accessories`
pub async fn list<C>(State(state): State<AppState<C>>) -> ListResponse
where
    C: SwitchControl + 'static,
{
    let accessories = state
        .bridge
        .accessories()
        .iter()
        .map(|accessory| AccessoryView::from(accessory.as_ref()))
        .collect();
    ListResponse::Ok(Json(accessories))
}

/// `GET /api/accessories/{id}`
pub async fn get<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    C: SwitchControl + 'static,
{
    let device_id = parse_id(&id)?;
    let accessory = state.bridge.accessory(&device_id).ok_or_else(|| {
        BridgeError::from(NotFoundError {
            entity: "Accessory",
            id: device_id.to_string(),
        })
    })?;
    let services = state
        .host
        .get(&device_id)
        .map(|record| ServiceView::from_record(&record))
        .unwrap_or_default();
    Ok(GetResponse::Ok(Json(AccessoryDetail {
        accessory: AccessoryView::from(accessory.as_ref()),
        services,
    })))
}

/// `PUT /api/accessories/{id}/on`
pub async fn set_on<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Json(req): Json<SetOnRequest>,
) -> Result<SetOnResponse, ApiError>
where
    C: SwitchControl + 'static,
{
    let device_id = parse_id(&id)?;
    state.bridge.set_on(&device_id, req.on).await?;
    Ok(SetOnResponse::NoContent)
}
