//! `api/system`: liveness, status and health of the server.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::transport::{Endpoint, Method, Params, TransportError, decode_json, decode_text};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingOptions;

impl Endpoint for PingOptions {
    /// `pong` on a live server.
    type Output = String;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "system/ping";

    fn params(&self) -> Params {
        Params::new()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_text(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SystemStatus {
    pub id: String,
    pub version: String,
    /// `STARTING`, `UP`, `DOWN`, `RESTARTING`, `DB_MIGRATION_NEEDED` or `DB_MIGRATION_RUNNING`.
    pub status: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusOptions;

impl Endpoint for StatusOptions {
    type Output = SystemStatus;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "system/status";

    fn params(&self) -> Params {
        Params::new()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HealthCause {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SystemHealth {
    /// `GREEN`, `YELLOW` or `RED`.
    pub health: String,
    pub causes: Vec<HealthCause>,
}

impl SystemHealth {
    pub fn is_green(&self) -> bool {
        self.health == "GREEN"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthOptions;

impl Endpoint for HealthOptions {
    type Output = SystemHealth;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "system/health";

    fn params(&self) -> Params {
        Params::new()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/system`.
pub struct System<'a> {
    client: &'a SonarClient,
}

impl<'a> System<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn ping(&self) -> Result<Response<String>, SonarError> {
        self.client.call(&PingOptions).await
    }

    pub async fn status(&self) -> Result<Response<SystemStatus>, SonarError> {
        self.client.call(&StatusOptions).await
    }

    pub async fn health(&self) -> Result<Response<SystemHealth>, SonarError> {
        self.client.call(&HealthOptions).await
    }
}
