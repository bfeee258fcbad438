//! Transport layer: endpoint descriptions and wire-format details.

mod params;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{Page, ValidationError};

pub use params::Params;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One SonarQube Web API operation.
///
/// An implementor is the options struct of the operation. It names the HTTP
/// method and the path below `api/`, checks its own fields, maps them to wire
/// parameters and knows how the response body is decoded. Operations that
/// return a typed body decode JSON (or raw text for XML/SVG endpoints);
/// operations answering `204 No Content` use `()` as output.
pub trait Endpoint {
    type Output;

    const METHOD: Method;
    const PATH: &'static str;

    /// Client-side checks run before any request is built.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn params(&self) -> Params;

    fn decode(body: &str) -> Result<Self::Output, TransportError>;
}

/// A search operation whose results can be walked page by page.
pub trait Paginated: Endpoint + Clone {
    type Item;

    /// The same request asking for `page` (1-based).
    fn with_page(&self, page: u32) -> Self;

    fn into_page(output: Self::Output) -> Page<Self::Item>;
}

pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    Ok(serde_json::from_str(body)?)
}

/// Keep the body as-is (XML backups, SVG badges, plain-text status).
pub fn decode_text(body: &str) -> Result<String, TransportError> {
    Ok(body.to_owned())
}

pub fn decode_empty(_body: &str) -> Result<(), TransportError> {
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorsJson {
    #[serde(default)]
    errors: Vec<ApiErrorJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorJson {
    msg: String,
}

/// Extract messages from a SonarQube error body (`{"errors":[{"msg":"..."}]}`).
///
/// Bodies that are not JSON-shaped yield no messages.
pub fn decode_api_error_messages(body: &str) -> Vec<String> {
    serde_json::from_str::<ApiErrorsJson>(body)
        .map(|parsed| parsed.errors.into_iter().map(|it| it.msg).collect())
        .unwrap_or_default()
}
