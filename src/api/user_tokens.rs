//! `api/user_tokens`: generate, list and revoke user tokens.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    ValidationError, is_value_authorized, optional, validate_format, validate_max_length,
    validate_required,
};
use crate::transport::{Endpoint, Method, Params, TransportError, decode_empty, decode_json};

pub const TOKEN_NAME_MAX_LENGTH: usize = 100;
pub const USER_TOKEN: &str = "USER_TOKEN";
pub const GLOBAL_ANALYSIS_TOKEN: &str = "GLOBAL_ANALYSIS_TOKEN";
pub const PROJECT_ANALYSIS_TOKEN: &str = "PROJECT_ANALYSIS_TOKEN";
pub const TOKEN_TYPES: &[&str] = &[USER_TOKEN, GLOBAL_ANALYSIS_TOKEN, PROJECT_ANALYSIS_TOKEN];

fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedToken {
    pub login: String,
    pub name: String,
    /// The secret value; only returned once.
    pub token: String,
    pub created_at: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub project_key: Option<String>,
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateTokenOptions {
    pub name: String,
    /// Defaults to the authenticated user.
    pub login: Option<String>,
    /// One of [`TOKEN_TYPES`]; the server defaults to `USER_TOKEN`.
    pub token_type: Option<String>,
    /// Required with `PROJECT_ANALYSIS_TOKEN`.
    pub project_key: Option<String>,
    /// `YYYY-MM-DD`.
    pub expiration_date: Option<String>,
}

impl Endpoint for GenerateTokenOptions {
    type Output = GeneratedToken;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "user_tokens/generate";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")?;
        validate_max_length(&self.name, TOKEN_NAME_MAX_LENGTH, "name")?;
        optional(self.token_type.as_deref().filter(|it| !it.is_empty()), |it| {
            is_value_authorized(it, TOKEN_TYPES, "type")
        })?;
        if self.token_type.as_deref() == Some(PROJECT_ANALYSIS_TOKEN) {
            validate_required(
                self.project_key.as_deref().unwrap_or_default(),
                "projectKey",
            )?;
        }
        optional(self.expiration_date.as_deref(), |it| {
            validate_format(it, is_iso_date, "expirationDate", "a YYYY-MM-DD date")
        })
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("name", &self.name)
            .push_opt("login", self.login.as_deref())
            .push_opt("type", self.token_type.as_deref())
            .push_opt("projectKey", self.project_key.as_deref())
            .push_opt("expirationDate", self.expiration_date.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevokeTokenOptions {
    pub name: String,
    pub login: Option<String>,
}

impl Endpoint for RevokeTokenOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "user_tokens/revoke";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("name", &self.name)
            .push_opt("login", self.login.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenProject {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserToken {
    pub name: String,
    pub created_at: String,
    pub last_connection_date: Option<String>,
    #[serde(rename = "type")]
    pub token_type: String,
    pub project: Option<TokenProject>,
    pub expiration_date: Option<String>,
    pub is_expired: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchTokensResponse {
    pub login: String,
    pub user_tokens: Vec<UserToken>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTokensOptions {
    pub login: Option<String>,
}

impl Endpoint for SearchTokensOptions {
    type Output = SearchTokensResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "user_tokens/search";

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push_opt("login", self.login.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/user_tokens`.
pub struct UserTokens<'a> {
    client: &'a SonarClient,
}

impl<'a> UserTokens<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        options: &GenerateTokenOptions,
    ) -> Result<Response<GeneratedToken>, SonarError> {
        self.client.call(options).await
    }

    pub async fn revoke(&self, options: &RevokeTokenOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn search(
        &self,
        options: &SearchTokensOptions,
    ) -> Result<Response<SearchTokensResponse>, SonarError> {
        self.client.call(options).await
    }
}
