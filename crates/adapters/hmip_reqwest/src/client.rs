//! HTTP client for the HomematicIP REST API.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;

use hmipbridge_app::ports::{StateSource, SwitchControl};
use hmipbridge_domain::command::SwitchStateCommand;
use hmipbridge_domain::device::HomeSnapshot;
use hmipbridge_domain::error::BridgeError;

use crate::config::HmipConfig;
use crate::decode;
use crate::error::HmipError;

/// API version sent in the `VERSION` header.
const API_VERSION: &str = "12";

/// Client description sent with `getCurrentState`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientCharacteristics {
    api_version: String,
    application_identifier: String,
    application_version: String,
    device_manufacturer: String,
    device_type: String,
    language: String,
    os_type: String,
    os_version: String,
}

impl ClientCharacteristics {
    fn from_config(config: &HmipConfig) -> Self {
        Self {
            api_version: "10".to_string(),
            application_identifier: config.application_identifier.clone(),
            application_version: env!("CARGO_PKG_VERSION").to_string(),
            device_manufacturer: "none".to_string(),
            device_type: "Computer".to_string(),
            language: config.language.clone(),
            os_type: std::env::consts::OS.to_string(),
            os_version: std::env::consts::ARCH.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentStateRequest<'a> {
    client_characteristics: &'a ClientCharacteristics,
    id: &'a str,
}

/// HomematicIP REST client.
///
/// Cheap to clone: the underlying reqwest client is reference counted.
#[derive(Debug, Clone)]
pub struct HmipClient {
    client: reqwest::Client,
    base_url: String,
    access_point_id: String,
    characteristics: ClientCharacteristics,
}

impl HmipClient {
    /// Build a client with the authentication headers preset.
    ///
    /// # Errors
    ///
    /// Returns [`HmipError::InvalidConfig`] when `rest_url` is empty,
    /// [`HmipError::InvalidHeader`] when a credential contains characters
    /// that are not allowed in headers, or [`HmipError::Http`] when the
    /// reqwest client cannot be built.
    pub fn new(config: &HmipConfig) -> Result<Self, HmipError> {
        if config.rest_url.trim().is_empty() {
            return Err(HmipError::InvalidConfig("rest_url must not be empty"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("VERSION", HeaderValue::from_static(API_VERSION));

        let mut auth_token = HeaderValue::from_str(&config.auth_token)?;
        auth_token.set_sensitive(true);
        headers.insert("AUTHTOKEN", auth_token);

        let mut client_auth = HeaderValue::from_str(&config.client_auth)?;
        client_auth.set_sensitive(true);
        headers.insert("CLIENTAUTH", client_auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(u64::from(config.request_timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            access_point_id: config.access_point_id.clone(),
            characteristics: ClientCharacteristics::from_config(config),
        })
    }

    /// `POST {rest_url}/hmip/{path}` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HmipError::Http`] on transport failures and
    /// [`HmipError::Status`] on non-success responses.
    #[tracing::instrument(skip(self, body))]
    pub async fn api_call<B>(&self, path: &str, body: &B) -> Result<reqwest::Response, HmipError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}/hmip/{path}", self.base_url);
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %body, "HomematicIP call rejected");
            return Err(HmipError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Send one `setSwitchState` command.
    ///
    /// # Errors
    ///
    /// See [`api_call`](Self::api_call).
    pub async fn send_switch_state(&self, command: &SwitchStateCommand) -> Result<(), HmipError> {
        self.api_call("device/control/setSwitchState", command)
            .await?;
        Ok(())
    }

    /// Fetch and decode the full home state.
    ///
    /// # Errors
    ///
    /// See [`api_call`](Self::api_call); also returns [`HmipError::Decode`]
    /// when the response is not a JSON object.
    pub async fn fetch_current_state(&self) -> Result<HomeSnapshot, HmipError> {
        let request = CurrentStateRequest {
            client_characteristics: &self.characteristics,
            id: &self.access_point_id,
        };
        let response = self.api_call("home/getCurrentState", &request).await?;
        let payload = response.bytes().await?;
        decode::current_state(&payload)
    }
}

impl SwitchControl for HmipClient {
    async fn set_switch_state(&self, command: SwitchStateCommand) -> Result<(), BridgeError> {
        self.send_switch_state(&command)
            .await
            .map_err(HmipError::into_domain)
    }
}

impl StateSource for HmipClient {
    async fn current_state(&self) -> Result<HomeSnapshot, BridgeError> {
        self.fetch_current_state()
            .await
            .map_err(HmipError::into_domain)
    }
}
