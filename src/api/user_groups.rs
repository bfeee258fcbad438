//! `api/user_groups`: group lifecycle and membership.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    Page, PaginationArgs, Paging, ValidationError, optional, validate_max_length,
    validate_required,
};
use crate::transport::{
    Endpoint, Method, Paginated, Params, TransportError, decode_empty, decode_json,
};

pub const GROUP_NAME_MAX_LENGTH: usize = 255;
pub const GROUP_DESCRIPTION_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub members_count: u64,
    pub default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateGroupResponse {
    pub group: Group,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateGroupOptions {
    pub name: String,
    pub description: Option<String>,
}

impl Endpoint for CreateGroupOptions {
    type Output = CreateGroupResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "user_groups/create";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")?;
        validate_max_length(&self.name, GROUP_NAME_MAX_LENGTH, "name")?;
        optional(self.description.as_deref(), |it| {
            validate_max_length(it, GROUP_DESCRIPTION_MAX_LENGTH, "description")
        })
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("name", &self.name)
            .push_opt("description", self.description.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteGroupOptions {
    pub name: String,
}

impl Endpoint for DeleteGroupOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "user_groups/delete";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("name", &self.name);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchGroupsResponse {
    pub paging: Paging,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchGroupsOptions {
    pub query: Option<String>,
    /// Fields to return (`name`, `description`, `membersCount`, ...), comma-joined.
    pub fields: Vec<String>,
    pub pagination: PaginationArgs,
}

impl Endpoint for SearchGroupsOptions {
    type Output = SearchGroupsResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "user_groups/search";

    fn validate(&self) -> Result<(), ValidationError> {
        self.pagination.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("q", self.query.as_deref())
            .push_comma("f", &self.fields)
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

impl Paginated for SearchGroupsOptions {
    type Item = Group;

    fn with_page(&self, page: u32) -> Self {
        Self {
            pagination: self.pagination.with_page(page),
            ..self.clone()
        }
    }

    fn into_page(output: Self::Output) -> Page<Self::Item> {
        Page {
            items: output.groups,
            total: output.paging.total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Group membership change: group `name` and user `login`.
pub struct MembershipOptions {
    pub name: String,
    pub login: String,
}

impl MembershipOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")?;
        validate_required(&self.login, "login")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("name", &self.name).push("login", &self.login);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddUserOptions(pub MembershipOptions);

impl Endpoint for AddUserOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "user_groups/add_user";

    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate()
    }

    fn params(&self) -> Params {
        self.0.params()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveUserOptions(pub MembershipOptions);

impl Endpoint for RemoveUserOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "user_groups/remove_user";

    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate()
    }

    fn params(&self) -> Params {
        self.0.params()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/user_groups`.
pub struct UserGroups<'a> {
    client: &'a SonarClient,
}

impl<'a> UserGroups<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        options: &CreateGroupOptions,
    ) -> Result<Response<CreateGroupResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn delete(&self, options: &DeleteGroupOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn search(
        &self,
        options: &SearchGroupsOptions,
    ) -> Result<Response<SearchGroupsResponse>, SonarError> {
        self.client.call(options).await
    }

    /// Collect every group matching `options`, across all pages.
    pub async fn search_all(
        &self,
        options: &SearchGroupsOptions,
    ) -> Result<Vec<Group>, SonarError> {
        self.client.search_all(options).await
    }

    pub async fn add_user(&self, options: &AddUserOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn remove_user(
        &self,
        options: &RemoveUserOptions,
    ) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;
    use crate::domain::ValidationErrorKind;

    #[test]
    fn create_bounds() {
        let options = CreateGroupOptions {
            name: "g".repeat(GROUP_NAME_MAX_LENGTH),
            description: Some("d".repeat(GROUP_DESCRIPTION_MAX_LENGTH)),
        };
        assert!(options.validate().is_ok());

        let err = CreateGroupOptions {
            description: Some("d".repeat(GROUP_DESCRIPTION_MAX_LENGTH + 1)),
            ..options
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "description");
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn membership_requires_group_then_login() {
        assert_eq!(
            AddUserOptions::default().validate().unwrap_err().field,
            "name"
        );
        let err = RemoveUserOptions(MembershipOptions {
            name: "devs".to_owned(),
            login: String::new(),
        })
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "login");
    }

    #[tokio::test]
    async fn search_sends_fields_and_decodes() {
        let json = r#"
        {
          "paging": {"pageIndex": 1, "pageSize": 100, "total": 1},
          "groups": [{"name": "sonar-users", "membersCount": 17, "default": true}]
        }
        "#;
        let transport = FakeTransport::new(200, json);
        let client = transport.client();

        let response = client
            .user_groups()
            .search(&SearchGroupsOptions {
                fields: vec!["name".to_owned(), "membersCount".to_owned()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(response.value.groups[0].members_count, 17);
        assert!(response.value.groups[0].default);
        assert_eq!(transport.last_request().param("f"), Some("name,membersCount"));
    }
}
