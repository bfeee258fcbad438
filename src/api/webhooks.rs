//! `api/webhooks`: webhook configuration and delivery history.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    Page, PaginationArgs, Paging, ValidationError, optional, validate_max_length,
    validate_min_length, validate_required,
};
use crate::transport::{
    Endpoint, Method, Paginated, Params, TransportError, decode_empty, decode_json,
};

pub const WEBHOOK_NAME_MAX_LENGTH: usize = 100;
pub const WEBHOOK_URL_MAX_LENGTH: usize = 512;
pub const WEBHOOK_SECRET_MIN_LENGTH: usize = 16;
pub const WEBHOOK_SECRET_MAX_LENGTH: usize = 200;

fn validate_definition(name: &str, url: &str, secret: Option<&str>) -> Result<(), ValidationError> {
    validate_required(name, "name")?;
    validate_max_length(name, WEBHOOK_NAME_MAX_LENGTH, "name")?;
    validate_required(url, "url")?;
    validate_max_length(url, WEBHOOK_URL_MAX_LENGTH, "url")?;
    optional(secret, |it| {
        validate_min_length(it, WEBHOOK_SECRET_MIN_LENGTH, "secret")?;
        validate_max_length(it, WEBHOOK_SECRET_MAX_LENGTH, "secret")
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Webhook {
    pub key: String,
    pub name: String,
    pub url: String,
    pub has_secret: bool,
    pub latest_delivery: Option<DeliverySummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateWebhookResponse {
    pub webhook: Webhook,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateWebhookOptions {
    pub name: String,
    pub url: String,
    /// Project key; without it the webhook is global.
    pub project: Option<String>,
    /// 16 to 200 characters when present.
    pub secret: Option<String>,
}

impl Endpoint for CreateWebhookOptions {
    type Output = CreateWebhookResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "webhooks/create";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_definition(&self.name, &self.url, self.secret.as_deref())
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("name", &self.name)
            .push("url", &self.url)
            .push_opt("project", self.project.as_deref())
            .push_opt("secret", self.secret.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateWebhookOptions {
    pub webhook: String,
    pub name: String,
    pub url: String,
    pub secret: Option<String>,
}

impl Endpoint for UpdateWebhookOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "webhooks/update";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.webhook, "webhook")?;
        validate_definition(&self.name, &self.url, self.secret.as_deref())
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("webhook", &self.webhook)
            .push("name", &self.name)
            .push("url", &self.url)
            .push_opt("secret", self.secret.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteWebhookOptions {
    pub webhook: String,
}

impl Endpoint for DeleteWebhookOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "webhooks/delete";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.webhook, "webhook")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("webhook", &self.webhook);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListWebhooksResponse {
    pub webhooks: Vec<Webhook>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWebhooksOptions {
    /// Without a project, global webhooks are listed.
    pub project: Option<String>,
}

impl Endpoint for ListWebhooksOptions {
    type Output = ListWebhooksResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "webhooks/list";

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push_opt("project", self.project.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// One notification attempt sent to a webhook URL.
pub struct DeliverySummary {
    pub id: String,
    pub at: String,
    pub success: bool,
    pub http_status: Option<u16>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Delivery {
    pub id: String,
    pub component_key: String,
    pub ce_task_id: Option<String>,
    pub name: String,
    pub url: String,
    pub at: String,
    pub success: bool,
    pub http_status: Option<u16>,
    pub duration_ms: u64,
    /// Only returned by `webhooks/delivery`.
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeliveriesResponse {
    pub paging: Paging,
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveriesOptions {
    pub ce_task_id: Option<String>,
    pub component_key: Option<String>,
    pub webhook: Option<String>,
    pub pagination: PaginationArgs,
}

impl Endpoint for DeliveriesOptions {
    type Output = DeliveriesResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "webhooks/deliveries";

    fn validate(&self) -> Result<(), ValidationError> {
        self.pagination.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("ceTaskId", self.ce_task_id.as_deref())
            .push_opt("componentKey", self.component_key.as_deref())
            .push_opt("webhook", self.webhook.as_deref())
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

impl Paginated for DeliveriesOptions {
    type Item = Delivery;

    fn with_page(&self, page: u32) -> Self {
        Self {
            pagination: self.pagination.with_page(page),
            ..self.clone()
        }
    }

    fn into_page(output: Self::Output) -> Page<Self::Item> {
        Page {
            items: output.deliveries,
            total: output.paging.total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeliveryResponse {
    pub delivery: Delivery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub delivery_id: String,
}

impl Endpoint for DeliveryOptions {
    type Output = DeliveryResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "webhooks/delivery";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.delivery_id, "deliveryId")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("deliveryId", &self.delivery_id);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/webhooks`.
pub struct Webhooks<'a> {
    client: &'a SonarClient,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        options: &CreateWebhookOptions,
    ) -> Result<Response<CreateWebhookResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn update(&self, options: &UpdateWebhookOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn delete(&self, options: &DeleteWebhookOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn list(
        &self,
        options: &ListWebhooksOptions,
    ) -> Result<Response<ListWebhooksResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn deliveries(
        &self,
        options: &DeliveriesOptions,
    ) -> Result<Response<DeliveriesResponse>, SonarError> {
        self.client.call(options).await
    }

    /// Collect the whole delivery history matching `options`.
    pub async fn deliveries_all(
        &self,
        options: &DeliveriesOptions,
    ) -> Result<Vec<Delivery>, SonarError> {
        self.client.search_all(options).await
    }

    pub async fn delivery(
        &self,
        options: &DeliveryOptions,
    ) -> Result<Response<DeliveryResponse>, SonarError> {
        self.client.call(options).await
    }
}
