use crate::device_snapshot::{ChargerSnapshot, DeviceKind, DiverterSnapshot};
use crate::error::ExporterError;
use diqwest::WithDigestAuth;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use std::env;

const DEFAULT_BASE_URL: &str = "https://s18.myenergi.net";

/// Client for the vendor cloud status API.
///
/// Authentication is HTTP digest (challenge-response) keyed by the hub serial
/// and API key; neither secret is ever sent in the clear. One outbound GET
/// per fetch, no retries — a failed poll contributes nothing for that pass.
#[derive(Debug)]
pub struct MyEnergiClient {
    base_url: String,
    hub_serial: String,
    api_key: String,
    client: reqwest::Client,
}

impl MyEnergiClient {
    pub fn new(base_url: String, hub_serial: String, api_key: String) -> Self {
        Self {
            base_url,
            hub_serial,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Builds a client from `MYENERGI_SERIAL`, `MYENERGI_API_KEY` and the
    /// optional `MYENERGI_URL` override.
    pub fn from_env() -> Result<Self, ExporterError> {
        let hub_serial =
            env::var("MYENERGI_SERIAL").map_err(|_| ExporterError::Config("MYENERGI_SERIAL"))?;
        let api_key =
            env::var("MYENERGI_API_KEY").map_err(|_| ExporterError::Config("MYENERGI_API_KEY"))?;
        let base_url = env::var("MYENERGI_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(base_url, hub_serial, api_key))
    }

    /// Fetches the current state of every charging station on the account.
    /// An empty array is valid and yields zero snapshots.
    pub async fn fetch_chargers(&self) -> Result<Vec<ChargerSnapshot>, ExporterError> {
        let envelope: ChargerEnvelope = self.get_status(DeviceKind::Charger).await?;
        Ok(envelope.zappi)
    }

    /// Fetches the current state of every diverter on the account.
    pub async fn fetch_diverters(&self) -> Result<Vec<DiverterSnapshot>, ExporterError> {
        let envelope: DiverterEnvelope = self.get_status(DeviceKind::Diverter).await?;
        Ok(envelope.eddi)
    }

    async fn get_status<T: DeserializeOwned>(&self, kind: DeviceKind) -> Result<T, ExporterError> {
        let url = format!("{}{}", self.base_url, kind.endpoint_path());
        let response = self
            .client
            .get(&url)
            .send_with_digest_auth(&self.hub_serial, &self.api_key)
            .await?
            .error_for_status()?;
        // json() consumes the body on every path, keeping the connection
        // reusable whether or not the decode succeeds.
        response
            .json::<T>()
            .await
            .map_err(|source| ExporterError::Decode { kind, source })
    }
}

#[derive(Debug, Deserialize)]
struct ChargerEnvelope {
    #[serde(default)]
    zappi: Vec<ChargerSnapshot>,
}

#[derive(Debug, Deserialize)]
struct DiverterEnvelope {
    #[serde(default)]
    eddi: Vec<DiverterSnapshot>,
}
