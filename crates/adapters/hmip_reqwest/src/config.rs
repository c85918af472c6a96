//! HomematicIP integration configuration.

use std::fmt;

use serde::Deserialize;

/// Configuration for the HomematicIP cloud connection.
///
/// `rest_url`, `auth_token` and `client_auth` come from pairing the bridge
/// with the access point; the bridge does not perform the pairing itself.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct HmipConfig {
    /// REST endpoint of the vendor cloud, e.g. `https://srv26.homematic.com:6969`.
    pub rest_url: String,
    /// Auth token issued during pairing.
    pub auth_token: String,
    /// Client auth hash derived from the access point id.
    pub client_auth: String,
    /// SGTIN of the access point, e.g. `3014F711A0000A9A4991B2F2`.
    pub access_point_id: String,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u16,
    /// Application identifier reported in client characteristics.
    pub application_identifier: String,
    /// Language reported in client characteristics.
    pub language: String,
}

impl Default for HmipConfig {
    fn default() -> Self {
        Self {
            rest_url: String::new(),
            auth_token: String::new(),
            client_auth: String::new(),
            access_point_id: String::new(),
            request_timeout_secs: 10,
            application_identifier: "hmipbridge".to_string(),
            language: "en_US".to_string(),
        }
    }
}

impl fmt::Debug for HmipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmipConfig")
            .field("rest_url", &self.rest_url)
            .field("auth_token", &"<redacted>")
            .field("client_auth", &"<redacted>")
            .field("access_point_id", &self.access_point_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("application_identifier", &self.application_identifier)
            .field("language", &self.language)
            .finish()
    }
}
