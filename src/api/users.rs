//! `api/users`: user search, creation and deactivation.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    Page, PaginationArgs, Paging, ValidationError, optional, validate_max_length,
    validate_min_length, validate_required,
};
use crate::transport::{Endpoint, Method, Paginated, Params, TransportError, decode_json};

pub const LOGIN_MIN_LENGTH: usize = 2;
pub const LOGIN_MAX_LENGTH: usize = 100;
pub const USER_NAME_MAX_LENGTH: usize = 200;
pub const EMAIL_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub login: String,
    pub name: String,
    pub email: Option<String>,
    pub active: bool,
    pub local: bool,
    pub groups: Vec<String>,
    pub scm_accounts: Vec<String>,
    pub tokens_count: Option<u32>,
    pub external_identity: Option<String>,
    pub external_provider: Option<String>,
    pub avatar: Option<String>,
    pub last_connection_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchUsersResponse {
    pub paging: Paging,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchUsersOptions {
    /// Matches login, name and email.
    pub query: Option<String>,
    pub pagination: PaginationArgs,
}

impl Endpoint for SearchUsersOptions {
    type Output = SearchUsersResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "users/search";

    fn validate(&self) -> Result<(), ValidationError> {
        self.pagination.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("q", self.query.as_deref())
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

impl Paginated for SearchUsersOptions {
    type Item = User;

    fn with_page(&self, page: u32) -> Self {
        Self {
            pagination: self.pagination.with_page(page),
            ..self.clone()
        }
    }

    fn into_page(output: Self::Output) -> Page<Self::Item> {
        Page {
            items: output.users,
            total: output.paging.total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserOptions {
    pub login: String,
    pub name: String,
    pub email: Option<String>,
    /// Required for local users.
    pub password: Option<String>,
    /// Defaults to `true` on the server.
    pub local: Option<bool>,
    pub scm_accounts: Vec<String>,
}

impl Endpoint for CreateUserOptions {
    type Output = UserResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "users/create";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.login, "login")?;
        validate_min_length(&self.login, LOGIN_MIN_LENGTH, "login")?;
        validate_max_length(&self.login, LOGIN_MAX_LENGTH, "login")?;
        validate_required(&self.name, "name")?;
        validate_max_length(&self.name, USER_NAME_MAX_LENGTH, "name")?;
        optional(self.email.as_deref(), |it| {
            validate_max_length(it, EMAIL_MAX_LENGTH, "email")
        })?;
        if self.local.unwrap_or(true) {
            validate_required(self.password.as_deref().unwrap_or_default(), "password")?;
        }
        Ok(())
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("login", &self.login)
            .push("name", &self.name)
            .push_opt("email", self.email.as_deref())
            .push_opt("password", self.password.as_deref())
            .push_opt("local", self.local)
            .push_repeated("scmAccount", &self.scm_accounts);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeactivateUserOptions {
    pub login: String,
    pub anonymize: Option<bool>,
}

impl Endpoint for DeactivateUserOptions {
    type Output = UserResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "users/deactivate";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.login, "login")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("login", &self.login)
            .push_opt("anonymize", self.anonymize);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/users`.
pub struct Users<'a> {
    client: &'a SonarClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        options: &SearchUsersOptions,
    ) -> Result<Response<SearchUsersResponse>, SonarError> {
        self.client.call(options).await
    }

    /// Collect every user matching `options`, across all pages.
    pub async fn search_all(&self, options: &SearchUsersOptions) -> Result<Vec<User>, SonarError> {
        self.client.search_all(options).await
    }

    pub async fn create(
        &self,
        options: &CreateUserOptions,
    ) -> Result<Response<UserResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn deactivate(
        &self,
        options: &DeactivateUserOptions,
    ) -> Result<Response<UserResponse>, SonarError> {
        self.client.call(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;
    use crate::domain::ValidationErrorKind;

    fn local_user() -> CreateUserOptions {
        CreateUserOptions {
            login: "jdoe".to_owned(),
            name: "J. Doe".to_owned(),
            password: Some("s3cr3t!".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn local_user_needs_password() {
        assert!(local_user().validate().is_ok());

        let err = CreateUserOptions {
            password: None,
            ..local_user()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "password");

        let external = CreateUserOptions {
            password: None,
            local: Some(false),
            ..local_user()
        };
        assert!(external.validate().is_ok());
    }

    #[test]
    fn login_length_bounds() {
        let err = CreateUserOptions {
            login: "j".to_owned(),
            ..local_user()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "login");
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);

        let at_bound = CreateUserOptions {
            login: "j".repeat(LOGIN_MAX_LENGTH),
            ..local_user()
        };
        assert!(at_bound.validate().is_ok());
    }

    #[test]
    fn scm_accounts_are_repeated() {
        let options = CreateUserOptions {
            scm_accounts: vec!["jdoe@corp".to_owned(), "john".to_owned()],
            ..local_user()
        };
        let pairs = options.params().into_pairs();
        let accounts = pairs
            .iter()
            .filter(|(k, _)| k == "scmAccount")
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>();
        assert_eq!(accounts, vec!["jdoe@corp", "john"]);
    }

    #[tokio::test]
    async fn search_all_handles_partial_last_page() {
        let transport = FakeTransport::with_responses(vec![
            (
                200,
                concat!(
                    r#"{"paging":{"pageIndex":1,"pageSize":2,"total":3},"#,
                    r#""users":[{"login":"a"},{"login":"b"}]}"#
                )
                .to_owned(),
            ),
            (
                200,
                r#"{"paging":{"pageIndex":2,"pageSize":2,"total":3},"users":[{"login":"c"}]}"#
                    .to_owned(),
            ),
        ]);
        let client = transport.client();

        let users = client
            .users()
            .search_all(&SearchUsersOptions {
                query: Some("x".to_owned()),
                pagination: PaginationArgs {
                    page: None,
                    page_size: Some(2),
                },
            })
            .await
            .unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.requests()[1].param("q"), Some("x"));
    }
}
