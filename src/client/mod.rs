//! Client layer: builds requests from endpoints, dispatches them and maps
//! HTTP outcomes to typed results.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::api::{
    AlmIntegrations, AlmSettings, Issues, NewCodePeriods, Permissions, ProjectBadges, Projects,
    QualityGates, QualityProfiles, System, UserGroups, UserTokens, Users, Webhooks,
};
use crate::domain::ValidationError;
use crate::transport::{Endpoint, Method, Paginated, Params, decode_api_error_messages};

const HOST_URL_VAR: &str = "SONAR_HOST_URL";
const TOKEN_VAR: &str = "SONAR_TOKEN";
const LOGIN_VAR: &str = "SONAR_LOGIN";
const PASSWORD_VAR: &str = "SONAR_PASSWORD";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct HttpRequest {
    method: Method,
    url: Url,
    form: Option<Vec<(String, String)>>,
    basic_auth: (String, Option<String>),
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let (username, password) = request.basic_auth;
            let builder = match request.method {
                Method::Get => self.client.get(request.url),
                Method::Post => self
                    .client
                    .post(request.url)
                    .form(&request.form.unwrap_or_default()),
            };
            let response = builder.basic_auth(username, password).send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}

#[derive(Clone)]
/// Credentials attached to every request as HTTP Basic auth.
pub enum Auth {
    /// User token sent as the username with an empty password.
    Token(String),
    /// Login and password of a SonarQube account.
    LoginPassword { login: String, password: String },
}

impl Auth {
    /// Create [`Auth::Token`]; the token must be non-empty after trimming.
    pub fn token(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        crate::domain::validate_required(trimmed, "token")?;
        Ok(Self::Token(trimmed.to_owned()))
    }

    /// Create [`Auth::LoginPassword`]; both parts must be non-empty.
    pub fn login_password(
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let login = login.into();
        let password = password.into();
        crate::domain::validate_required(login.trim(), "login")?;
        crate::domain::validate_required(&password, "password")?;
        Ok(Self::LoginPassword {
            login: login.trim().to_owned(),
            password,
        })
    }

    fn basic_auth(&self) -> (String, Option<String>) {
        match self {
            Self::Token(token) => (token.clone(), None),
            Self::LoginPassword { login, password } => (login.clone(), Some(password.clone())),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
            Self::LoginPassword { login, .. } => f
                .debug_struct("LoginPassword")
                .field("login", login)
                .field("password", &"***")
                .finish(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SonarClient`] operations.
///
/// Validation errors are raised before any network activity. Every other
/// variant describes the outcome of a single HTTP round trip; nothing is retried.
pub enum SonarError {
    /// A request option was rejected client-side.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    ///
    /// `messages` holds the API error messages when the body is JSON-shaped.
    #[error("unexpected HTTP status: {status}")]
    Http {
        status: u16,
        body: Option<String>,
        messages: Vec<String>,
    },

    /// Response body could not be decoded into the expected type.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The request URL could not be built from the base URL and endpoint path.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Client configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SonarError {
    /// HTTP status of a non-2xx response, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A decoded result together with the HTTP response metadata.
pub struct Response<T> {
    pub status: u16,
    pub content_type: Option<String>,
    pub value: T,
}

impl<T> Response<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SonarClient`].
///
/// Use this when you need to customize the timeout or user-agent, or to read
/// the configuration from the environment.
pub struct SonarClientBuilder {
    base_url: String,
    auth: Auth,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SonarClientBuilder {
    /// Create a builder for the server at `base_url` (for example
    /// `https://sonar.example.com` or `https://example.com/sonarqube`).
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            timeout: None,
            user_agent: None,
        }
    }

    /// Read `SONAR_HOST_URL` and either `SONAR_TOKEN` or
    /// `SONAR_LOGIN` + `SONAR_PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self, SonarError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SonarError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_url = non_empty(HOST_URL_VAR)
            .ok_or_else(|| SonarError::Config(format!("{HOST_URL_VAR} is not set")))?;
        let auth = match (non_empty(TOKEN_VAR), non_empty(LOGIN_VAR)) {
            (Some(token), _) => Auth::token(token)?,
            (None, Some(login)) => {
                let password = non_empty(PASSWORD_VAR).ok_or_else(|| {
                    SonarError::Config(format!("{PASSWORD_VAR} is required with {LOGIN_VAR}"))
                })?;
                Auth::login_password(login, password)?
            }
            (None, None) => {
                return Err(SonarError::Config(format!(
                    "either {TOKEN_VAR} or {LOGIN_VAR} must be set"
                )));
            }
        };
        Ok(Self::new(base_url, auth))
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SonarClient`].
    pub fn build(self) -> Result<SonarClient, SonarError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SonarError::Transport(Box::new(err)))?;

        Ok(SonarClient {
            api_url: api_url(&self.base_url)?,
            auth: self.auth,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

/// `<base>/api/`, with the trailing slash needed for relative joins.
fn api_url(base_url: &str) -> Result<Url, SonarError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let mut url = Url::parse(&format!("{trimmed}/"))?;
    if url.cannot_be_a_base() {
        return Err(SonarError::Config(format!(
            "base URL {base_url:?} cannot be used as a base"
        )));
    }
    if !url.path().ends_with("/api/") {
        url = url.join("api/")?;
    }
    Ok(url)
}

#[derive(Clone)]
/// High-level SonarQube client.
///
/// Holds only immutable configuration (API base URL, credentials and the HTTP
/// client), so it can be cloned and shared across tasks freely. Resource
/// groups are reached through handles such as [`SonarClient::issues`].
pub struct SonarClient {
    api_url: Url,
    auth: Auth,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for SonarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonarClient")
            .field("api_url", &self.api_url.as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl SonarClient {
    /// Create a client with default HTTP settings.
    ///
    /// For more customization, use [`SonarClient::builder`].
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Result<Self, SonarError> {
        SonarClientBuilder::new(base_url, auth).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(base_url: impl Into<String>, auth: Auth) -> SonarClientBuilder {
        SonarClientBuilder::new(base_url, auth)
    }

    /// Base URL every endpoint path is resolved against (ends with `api/`).
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn alm_integrations(&self) -> AlmIntegrations<'_> {
        AlmIntegrations::new(self)
    }

    pub fn alm_settings(&self) -> AlmSettings<'_> {
        AlmSettings::new(self)
    }

    pub fn issues(&self) -> Issues<'_> {
        Issues::new(self)
    }

    pub fn new_code_periods(&self) -> NewCodePeriods<'_> {
        NewCodePeriods::new(self)
    }

    pub fn permissions(&self) -> Permissions<'_> {
        Permissions::new(self)
    }

    pub fn project_badges(&self) -> ProjectBadges<'_> {
        ProjectBadges::new(self)
    }

    pub fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    pub fn quality_gates(&self) -> QualityGates<'_> {
        QualityGates::new(self)
    }

    pub fn quality_profiles(&self) -> QualityProfiles<'_> {
        QualityProfiles::new(self)
    }

    pub fn system(&self) -> System<'_> {
        System::new(self)
    }

    pub fn user_groups(&self) -> UserGroups<'_> {
        UserGroups::new(self)
    }

    pub fn user_tokens(&self) -> UserTokens<'_> {
        UserTokens::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    /// Validate `endpoint`, send it and decode the response.
    ///
    /// Errors:
    /// - [`SonarError::Validation`] when an option is rejected (no request is sent),
    /// - [`SonarError::Http`] for non-2xx HTTP responses,
    /// - [`SonarError::Parse`] when a 2xx body cannot be decoded.
    pub async fn call<E: Endpoint>(&self, endpoint: &E) -> Result<Response<E::Output>, SonarError> {
        endpoint.validate()?;
        let request = self.build_request(E::METHOD, E::PATH, endpoint.params())?;

        debug!(method = E::METHOD.as_str(), path = E::PATH, "sending request");
        let response = self
            .http
            .send(request)
            .await
            .map_err(SonarError::Transport)?;
        debug!(
            method = E::METHOD.as_str(),
            path = E::PATH,
            status = response.status,
            "received response"
        );

        if !(200..=299).contains(&response.status) {
            warn!(path = E::PATH, status = response.status, "request failed");
            let messages = decode_api_error_messages(&response.body);
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(SonarError::Http {
                status: response.status,
                body,
                messages,
            });
        }

        let value = E::decode(&response.body).map_err(|err| SonarError::Parse(Box::new(err)))?;
        Ok(Response {
            status: response.status,
            content_type: response.content_type,
            value,
        })
    }

    /// Walk every page of a search endpoint, starting at page 1.
    ///
    /// Stops once the number of collected items reaches the total reported by
    /// the server, or when a page comes back empty.
    pub async fn search_all<E: Paginated>(&self, endpoint: &E) -> Result<Vec<E::Item>, SonarError> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let response = self.call(&endpoint.with_page(page)).await?;
            let chunk = E::into_page(response.value);
            let received = chunk.items.len();
            items.extend(chunk.items);
            debug!(path = E::PATH, page, received, total = chunk.total, "fetched page");

            if received == 0 || items.len() as u64 >= chunk.total {
                return Ok(items);
            }
            page += 1;
        }
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> Result<HttpRequest, SonarError> {
        let mut url = self.api_url.join(path.trim_start_matches('/'))?;
        let form = match method {
            Method::Get => {
                if !params.is_empty() {
                    url.query_pairs_mut().extend_pairs(params.as_pairs());
                }
                None
            }
            Method::Post => Some(params.into_pairs()),
        };
        Ok(HttpRequest {
            method,
            url,
            form,
            basic_auth: self.auth.basic_auth(),
        })
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::testing::FakeTransport;
    use super::*;
    use crate::domain::{Page, ValidationErrorKind};
    use crate::transport::{TransportError, decode_empty, decode_json};

    #[derive(Debug, Clone, Default)]
    struct Ping {
        name: String,
    }

    impl Endpoint for Ping {
        type Output = serde_json::Value;

        const METHOD: Method = Method::Get;
        const PATH: &'static str = "tests/ping";

        fn validate(&self) -> Result<(), ValidationError> {
            crate::domain::validate_required(&self.name, "name")
        }

        fn params(&self) -> Params {
            let mut params = Params::new();
            params.push("name", &self.name);
            params
        }

        fn decode(body: &str) -> Result<Self::Output, TransportError> {
            decode_json(body)
        }
    }

    struct Touch;

    impl Endpoint for Touch {
        type Output = ();

        const METHOD: Method = Method::Post;
        const PATH: &'static str = "tests/touch";

        fn params(&self) -> Params {
            let mut params = Params::new();
            params.push("flag", true);
            params
        }

        fn decode(body: &str) -> Result<Self::Output, TransportError> {
            decode_empty(body)
        }
    }

    #[derive(Debug, Clone)]
    struct Numbers {
        page: Option<u32>,
    }

    #[derive(Debug, serde::Deserialize)]
    struct NumbersPage {
        total: u64,
        items: Vec<u32>,
    }

    impl Endpoint for Numbers {
        type Output = NumbersPage;

        const METHOD: Method = Method::Get;
        const PATH: &'static str = "tests/numbers";

        fn params(&self) -> Params {
            let mut params = Params::new();
            params.push_opt("p", self.page).push("ps", 2);
            params
        }

        fn decode(body: &str) -> Result<Self::Output, TransportError> {
            decode_json(body)
        }
    }

    impl Paginated for Numbers {
        type Item = u32;

        fn with_page(&self, page: u32) -> Self {
            Self { page: Some(page) }
        }

        fn into_page(output: Self::Output) -> Page<Self::Item> {
            Page {
                items: output.items,
                total: output.total,
            }
        }
    }

    #[tokio::test]
    async fn get_encodes_params_in_query_and_sends_basic_auth() {
        let transport = FakeTransport::new(200, r#"{"ok":true}"#);
        let client = transport.client();

        let response = client
            .call(&Ping {
                name: "a b".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.value["ok"], serde_json::Value::Bool(true));

        let request = transport.last_request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/api/tests/ping");
        assert_eq!(request.param("name"), Some("a b"));
        assert_eq!(request.basic_auth, ("squ_test".to_owned(), None));
    }

    #[tokio::test]
    async fn post_encodes_params_in_form_and_discards_body() {
        let transport = FakeTransport::new(204, "");
        let client = transport.client();

        let response = client.call(&Touch).await.unwrap();
        assert_eq!(response.status, 204);

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.param("flag"), Some("true"));
    }

    #[tokio::test]
    async fn validation_failure_sends_nothing() {
        let transport = FakeTransport::new(200, "{}");
        let client = transport.client();

        let err = client.call(&Ping::default()).await.unwrap_err();
        match err {
            SonarError::Validation(err) => {
                assert_eq!(err.field, "name");
                assert_eq!(err.kind, ValidationErrorKind::MissingRequired);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_keeps_body_and_api_messages() {
        let transport = FakeTransport::new(404, r#"{"errors":[{"msg":"Component not found"}]}"#);
        let client = transport.client();

        let err = client
            .call(&Ping {
                name: "x".to_owned(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        match err {
            SonarError::Http { body, messages, .. } => {
                assert!(body.is_some());
                assert_eq!(messages, vec!["Component not found".to_owned()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_error_body_maps_to_none() {
        let transport = FakeTransport::new(503, "  ");
        let client = transport.client();

        let err = client.call(&Touch).await.unwrap_err();
        assert!(matches!(
            err,
            SonarError::Http {
                status: 503,
                body: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn invalid_json_maps_to_parse_error() {
        let transport = FakeTransport::new(200, "{ not json }");
        let client = transport.client();

        let err = client
            .call(&Ping {
                name: "x".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SonarError::Parse(_)));
    }

    #[tokio::test]
    async fn search_all_stops_at_reported_total() {
        let transport = FakeTransport::with_responses(vec![
            (200, r#"{"total":5,"items":[1,2]}"#.to_owned()),
            (200, r#"{"total":5,"items":[3,4]}"#.to_owned()),
            (200, r#"{"total":5,"items":[5]}"#.to_owned()),
            (200, r#"{"total":5,"items":[6]}"#.to_owned()),
        ]);
        let client = transport.client();

        let items = client.search_all(&Numbers { page: None }).await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);

        let pages = transport
            .requests()
            .iter()
            .map(|it| it.param("p").unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(pages, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn search_all_terminates_on_zero_total() {
        let transport = FakeTransport::new(200, r#"{"total":0,"items":[]}"#);
        let client = transport.client();

        let items = client.search_all(&Numbers { page: None }).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn search_all_stops_on_empty_page_when_total_overstates() {
        let transport = FakeTransport::with_responses(vec![
            (200, r#"{"total":10,"items":[1,2]}"#.to_owned()),
            (200, r#"{"total":10,"items":[]}"#.to_owned()),
        ]);
        let client = transport.client();

        let items = client.search_all(&Numbers { page: None }).await.unwrap();
        assert_eq!(items, vec![1, 2]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn api_url_appends_api_segment_once() {
        assert_eq!(
            api_url("https://sonar.example.com").unwrap().as_str(),
            "https://sonar.example.com/api/"
        );
        assert_eq!(
            api_url("https://example.com/sonarqube/").unwrap().as_str(),
            "https://example.com/sonarqube/api/"
        );
        assert_eq!(
            api_url("https://example.com/api").unwrap().as_str(),
            "https://example.com/api/"
        );
        assert!(matches!(api_url("not a url"), Err(SonarError::Url(_))));
    }

    #[test]
    fn auth_constructors_validate_inputs() {
        assert!(Auth::token("   ").is_err());
        assert!(Auth::login_password("", "pass").is_err());
        assert!(Auth::login_password("user", "").is_err());
        assert_eq!(
            Auth::login_password("user", "pass").unwrap().basic_auth(),
            ("user".to_owned(), Some("pass".to_owned()))
        );
    }

    #[test]
    fn auth_debug_hides_secrets() {
        let rendered = format!("{:?}", Auth::token("squ_secret").unwrap());
        assert!(!rendered.contains("squ_secret"));
    }

    #[test]
    fn from_lookup_prefers_token() {
        let env = HashMap::from([
            (HOST_URL_VAR, "https://sonar.example.com"),
            (TOKEN_VAR, "squ_abc"),
            (LOGIN_VAR, "admin"),
        ]);
        let builder =
            SonarClientBuilder::from_lookup(|name| env.get(name).map(|v| (*v).to_owned()))
                .unwrap();
        assert_eq!(builder.base_url, "https://sonar.example.com");
        assert!(matches!(builder.auth, Auth::Token(ref token) if token == "squ_abc"));
    }

    #[test]
    fn from_lookup_requires_password_with_login() {
        let env = HashMap::from([
            (HOST_URL_VAR, "https://sonar.example.com"),
            (LOGIN_VAR, "admin"),
        ]);
        let err = SonarClientBuilder::from_lookup(|name| env.get(name).map(|v| (*v).to_owned()))
            .unwrap_err();
        assert!(matches!(err, SonarError::Config(_)));
    }

    #[test]
    fn from_lookup_requires_host_url() {
        let err = SonarClientBuilder::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, SonarError::Config(ref msg) if msg.contains(HOST_URL_VAR)));
    }
}
