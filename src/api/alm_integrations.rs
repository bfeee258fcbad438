//! `api/alm_integrations`: personal access tokens and project import from
//! Azure DevOps, Bitbucket, GitHub and GitLab.

use serde::Deserialize;

use crate::api::projects::CreatedProject;
use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    PaginationArgs, Paging, ValidationError, optional, validate_max_length,
    validate_new_code_definition, validate_required,
};
use crate::transport::{Endpoint, Method, Params, TransportError, decode_empty, decode_json};

pub const ALM_SETTING_MAX_LENGTH: usize = 200;
pub const PAT_MAX_LENGTH: usize = 2000;
pub const USERNAME_MAX_LENGTH: usize = 2000;
pub const GITHUB_REPOSITORY_KEY_MAX_LENGTH: usize = 256;
/// Page-size bound of the ALM repository/organization listings.
pub const ALM_MAX_PAGE_SIZE: i64 = 100;

fn validate_alm_setting(value: Option<&str>) -> Result<(), ValidationError> {
    optional(value, |it| {
        validate_max_length(it, ALM_SETTING_MAX_LENGTH, "almSetting")
    })
}

fn validate_new_code(new_code: &NewCodeDefinition) -> Result<(), ValidationError> {
    validate_new_code_definition(
        new_code.definition_type.as_deref(),
        new_code.value.as_deref(),
        "newCodeDefinitionType",
        "newCodeDefinitionValue",
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// New-code definition applied to an imported project.
pub struct NewCodeDefinition {
    /// One of `PREVIOUS_VERSION`, `NUMBER_OF_DAYS`, `REFERENCE_BRANCH`.
    pub definition_type: Option<String>,
    /// Number of days, only with `NUMBER_OF_DAYS`.
    pub value: Option<String>,
}

impl NewCodeDefinition {
    pub fn number_of_days(days: u32) -> Self {
        Self {
            definition_type: Some(crate::domain::NUMBER_OF_DAYS.to_owned()),
            value: Some(days.to_string()),
        }
    }

    fn push_params(&self, params: &mut Params) {
        params
            .push_opt("newCodeDefinitionType", self.definition_type.as_deref())
            .push_opt("newCodeDefinitionValue", self.value.as_deref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckPatOptions {
    pub alm_setting: Option<String>,
}

impl Endpoint for CheckPatOptions {
    type Output = ();

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/check_pat";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push_opt("almSetting", self.alm_setting.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetPatOptions {
    pub alm_setting: Option<String>,
    pub pat: String,
    /// Bitbucket Cloud only.
    pub username: Option<String>,
}

impl Endpoint for SetPatOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "alm_integrations/set_pat";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        validate_required(&self.pat, "pat")?;
        validate_max_length(&self.pat, PAT_MAX_LENGTH, "pat")?;
        optional(self.username.as_deref(), |it| {
            validate_max_length(it, USERNAME_MAX_LENGTH, "username")
        })
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push("pat", &self.pat)
            .push_opt("username", self.username.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportProjectResponse {
    pub project: CreatedProject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportAzureProjectOptions {
    pub alm_setting: Option<String>,
    pub project_name: String,
    pub repository_name: String,
    pub new_code_definition: NewCodeDefinition,
}

impl Endpoint for ImportAzureProjectOptions {
    type Output = ImportProjectResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "alm_integrations/import_azure_project";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        validate_required(&self.project_name, "projectName")?;
        validate_required(&self.repository_name, "repositoryName")?;
        validate_new_code(&self.new_code_definition)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push("projectName", &self.project_name)
            .push("repositoryName", &self.repository_name);
        self.new_code_definition.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBitbucketCloudRepoOptions {
    pub alm_setting: Option<String>,
    pub repository_slug: String,
    pub new_code_definition: NewCodeDefinition,
}

impl Endpoint for ImportBitbucketCloudRepoOptions {
    type Output = ImportProjectResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "alm_integrations/import_bitbucketcloud_repo";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        validate_required(&self.repository_slug, "repositorySlug")?;
        validate_new_code(&self.new_code_definition)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push("repositorySlug", &self.repository_slug);
        self.new_code_definition.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBitbucketServerProjectOptions {
    pub alm_setting: Option<String>,
    pub project_key: String,
    pub repository_slug: String,
    pub new_code_definition: NewCodeDefinition,
}

impl Endpoint for ImportBitbucketServerProjectOptions {
    type Output = ImportProjectResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "alm_integrations/import_bitbucketserver_project";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        validate_required(&self.project_key, "projectKey")?;
        validate_required(&self.repository_slug, "repositorySlug")?;
        validate_new_code(&self.new_code_definition)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push("projectKey", &self.project_key)
            .push("repositorySlug", &self.repository_slug);
        self.new_code_definition.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportGithubProjectOptions {
    pub alm_setting: Option<String>,
    /// `<organization>/<repository>`.
    pub repository_key: String,
    pub new_code_definition: NewCodeDefinition,
}

impl Endpoint for ImportGithubProjectOptions {
    type Output = ImportProjectResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "alm_integrations/import_github_project";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        validate_required(&self.repository_key, "repositoryKey")?;
        validate_max_length(
            &self.repository_key,
            GITHUB_REPOSITORY_KEY_MAX_LENGTH,
            "repositoryKey",
        )?;
        validate_new_code(&self.new_code_definition)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push("repositoryKey", &self.repository_key);
        self.new_code_definition.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportGitlabProjectOptions {
    pub alm_setting: Option<String>,
    pub gitlab_project_id: String,
    pub new_code_definition: NewCodeDefinition,
}

impl Endpoint for ImportGitlabProjectOptions {
    type Output = ImportProjectResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "alm_integrations/import_gitlab_project";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        validate_required(&self.gitlab_project_id, "gitlabProjectId")?;
        validate_new_code(&self.new_code_definition)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push("gitlabProjectId", &self.gitlab_project_id);
        self.new_code_definition.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Options of the listings that only take the ALM setting key.
pub struct AlmSettingOptions {
    pub alm_setting: Option<String>,
}

impl AlmSettingOptions {
    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push_opt("almSetting", self.alm_setting.as_deref());
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AzureProject {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListAzureProjectsResponse {
    pub projects: Vec<AzureProject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAzureProjectsOptions(pub AlmSettingOptions);

impl Endpoint for ListAzureProjectsOptions {
    type Output = ListAzureProjectsResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/list_azure_projects";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.0.alm_setting.as_deref())
    }

    fn params(&self) -> Params {
        self.0.params()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BitbucketServerProject {
    pub id: i64,
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListBitbucketServerProjectsResponse {
    pub projects: Vec<BitbucketServerProject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBitbucketServerProjectsOptions(pub AlmSettingOptions);

impl Endpoint for ListBitbucketServerProjectsOptions {
    type Output = ListBitbucketServerProjectsResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/list_bitbucketserver_projects";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.0.alm_setting.as_deref())
    }

    fn params(&self) -> Params {
        self.0.params()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GithubOrganization {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListGithubOrganizationsResponse {
    pub paging: Paging,
    pub organizations: Vec<GithubOrganization>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGithubOrganizationsOptions {
    pub alm_setting: Option<String>,
    pub pagination: PaginationArgs,
}

impl Endpoint for ListGithubOrganizationsOptions {
    type Output = ListGithubOrganizationsResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/list_github_organizations";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        self.pagination.validate_with_max(ALM_MAX_PAGE_SIZE)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubRepository {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub url: String,
    pub sq_project_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListGithubRepositoriesResponse {
    pub paging: Paging,
    pub repositories: Vec<GithubRepository>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGithubRepositoriesOptions {
    pub alm_setting: Option<String>,
    pub organization: String,
    pub query: Option<String>,
    pub pagination: PaginationArgs,
}

impl Endpoint for ListGithubRepositoriesOptions {
    type Output = ListGithubRepositoriesResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/list_github_repositories";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        validate_required(&self.organization, "organization")?;
        self.pagination.validate_with_max(ALM_MAX_PAGE_SIZE)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push("organization", &self.organization)
            .push_opt("q", self.query.as_deref())
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureRepository {
    pub name: String,
    pub project_name: String,
    pub sq_project_key: Option<String>,
    pub sq_project_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchAzureReposResponse {
    pub repositories: Vec<AzureRepository>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchAzureReposOptions {
    pub alm_setting: Option<String>,
    pub project_name: Option<String>,
    pub search_query: Option<String>,
}

impl Endpoint for SearchAzureReposOptions {
    type Output = SearchAzureReposResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/search_azure_repos";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push_opt("projectName", self.project_name.as_deref())
            .push_opt("searchQuery", self.search_query.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BitbucketCloudRepository {
    pub name: String,
    pub project_key: String,
    pub slug: String,
    pub sq_project_key: Option<String>,
    pub uuid: String,
    pub workspace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchBitbucketCloudReposResponse {
    pub is_last_page: bool,
    pub paging: Paging,
    pub repositories: Vec<BitbucketCloudRepository>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBitbucketCloudReposOptions {
    pub alm_setting: Option<String>,
    pub repository_name: Option<String>,
    pub pagination: PaginationArgs,
}

impl Endpoint for SearchBitbucketCloudReposOptions {
    type Output = SearchBitbucketCloudReposResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/search_bitbucketcloud_repos";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        self.pagination.validate_with_max(ALM_MAX_PAGE_SIZE)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push_opt("repositoryName", self.repository_name.as_deref())
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BitbucketServerRepository {
    pub id: i64,
    pub name: String,
    pub project_key: String,
    pub slug: String,
    pub sq_project_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchBitbucketServerReposResponse {
    pub is_last_page: bool,
    pub repositories: Vec<BitbucketServerRepository>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBitbucketServerReposOptions {
    pub alm_setting: Option<String>,
    pub project_name: Option<String>,
    pub repository_name: Option<String>,
}

impl Endpoint for SearchBitbucketServerReposOptions {
    type Output = SearchBitbucketServerReposResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/search_bitbucketserver_repos";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push_opt("projectName", self.project_name.as_deref())
            .push_opt("repositoryName", self.repository_name.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GitlabRepository {
    pub id: i64,
    pub name: String,
    pub path_name: String,
    pub path_slug: String,
    pub slug: String,
    pub sq_project_key: Option<String>,
    pub sq_project_name: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchGitlabReposResponse {
    pub paging: Paging,
    pub repositories: Vec<GitlabRepository>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchGitlabReposOptions {
    pub alm_setting: Option<String>,
    pub project_name: Option<String>,
    pub pagination: PaginationArgs,
}

impl Endpoint for SearchGitlabReposOptions {
    type Output = SearchGitlabReposResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "alm_integrations/search_gitlab_repos";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_alm_setting(self.alm_setting.as_deref())?;
        self.pagination.validate_with_max(ALM_MAX_PAGE_SIZE)
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("almSetting", self.alm_setting.as_deref())
            .push_opt("projectName", self.project_name.as_deref())
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/alm_integrations`.
pub struct AlmIntegrations<'a> {
    client: &'a SonarClient,
}

impl<'a> AlmIntegrations<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Check that the stored personal access token is valid for the ALM setting.
    pub async fn check_pat(&self, options: &CheckPatOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    /// Store a personal access token for the current user.
    pub async fn set_pat(&self, options: &SetPatOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn import_azure_project(
        &self,
        options: &ImportAzureProjectOptions,
    ) -> Result<Response<ImportProjectResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn import_bitbucketcloud_repo(
        &self,
        options: &ImportBitbucketCloudRepoOptions,
    ) -> Result<Response<ImportProjectResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn import_bitbucketserver_project(
        &self,
        options: &ImportBitbucketServerProjectOptions,
    ) -> Result<Response<ImportProjectResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn import_github_project(
        &self,
        options: &ImportGithubProjectOptions,
    ) -> Result<Response<ImportProjectResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn import_gitlab_project(
        &self,
        options: &ImportGitlabProjectOptions,
    ) -> Result<Response<ImportProjectResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn list_azure_projects(
        &self,
        options: &ListAzureProjectsOptions,
    ) -> Result<Response<ListAzureProjectsResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn list_bitbucketserver_projects(
        &self,
        options: &ListBitbucketServerProjectsOptions,
    ) -> Result<Response<ListBitbucketServerProjectsResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn list_github_organizations(
        &self,
        options: &ListGithubOrganizationsOptions,
    ) -> Result<Response<ListGithubOrganizationsResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn list_github_repositories(
        &self,
        options: &ListGithubRepositoriesOptions,
    ) -> Result<Response<ListGithubRepositoriesResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn search_azure_repos(
        &self,
        options: &SearchAzureReposOptions,
    ) -> Result<Response<SearchAzureReposResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn search_bitbucketcloud_repos(
        &self,
        options: &SearchBitbucketCloudReposOptions,
    ) -> Result<Response<SearchBitbucketCloudReposResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn search_bitbucketserver_repos(
        &self,
        options: &SearchBitbucketServerReposOptions,
    ) -> Result<Response<SearchBitbucketServerReposResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn search_gitlab_repos(
        &self,
        options: &SearchGitlabReposOptions,
    ) -> Result<Response<SearchGitlabReposResponse>, SonarError> {
        self.client.call(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;
    use crate::domain::{PREVIOUS_VERSION, ValidationErrorKind};

    fn validation_error(err: SonarError) -> ValidationError {
        match err {
            SonarError::Validation(err) => err,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn azure_import(definition_type: &str, value: &str) -> ImportAzureProjectOptions {
        ImportAzureProjectOptions {
            alm_setting: Some("azure".to_owned()),
            project_name: "project".to_owned(),
            repository_name: "repo".to_owned(),
            new_code_definition: NewCodeDefinition {
                definition_type: Some(definition_type.to_owned()),
                value: Some(value.to_owned()).filter(|it| !it.is_empty()),
            },
        }
    }

    #[tokio::test]
    async fn check_pat_succeeds_on_ok_response() {
        let transport = FakeTransport::new(200, "{}");
        let client = transport.client();

        let response = client
            .alm_integrations()
            .check_pat(&CheckPatOptions {
                alm_setting: Some("my-azure-setting".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let request = transport.last_request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/api/alm_integrations/check_pat");
        assert_eq!(request.param("almSetting"), Some("my-azure-setting"));
    }

    #[tokio::test]
    async fn set_pat_rejects_oversized_token_without_request() {
        let transport = FakeTransport::new(204, "");
        let client = transport.client();

        let err = client
            .alm_integrations()
            .set_pat(&SetPatOptions {
                pat: "x".repeat(PAT_MAX_LENGTH + 1),
                ..Default::default()
            })
            .await
            .unwrap_err();
        let err = validation_error(err);
        assert_eq!(err.field, "pat");
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn set_pat_length_bounds() {
        let at_bound = SetPatOptions {
            pat: "x".repeat(PAT_MAX_LENGTH),
            username: Some("u".repeat(USERNAME_MAX_LENGTH)),
            ..Default::default()
        };
        assert!(at_bound.validate().is_ok());

        let err = SetPatOptions::default().validate().unwrap_err();
        assert_eq!(err.field, "pat");
        assert_eq!(err.kind, ValidationErrorKind::MissingRequired);

        let err = SetPatOptions {
            alm_setting: Some("a".repeat(ALM_SETTING_MAX_LENGTH + 1)),
            pat: "x".to_owned(),
            username: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "almSetting");
    }

    #[tokio::test]
    async fn set_pat_posts_form() {
        let transport = FakeTransport::new(204, "");
        let client = transport.client();

        client
            .alm_integrations()
            .set_pat(&SetPatOptions {
                alm_setting: Some("bbc".to_owned()),
                pat: "secret".to_owned(),
                username: Some("me".to_owned()),
            })
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.param("pat"), Some("secret"));
        assert_eq!(request.param("username"), Some("me"));
    }

    #[test]
    fn import_azure_new_code_matrix() {
        let err = azure_import("NUMBER_OF_DAYS", "").validate().unwrap_err();
        assert_eq!(err.field, "newCodeDefinitionValue");
        assert!(azure_import("NUMBER_OF_DAYS", "30").validate().is_ok());

        let err = azure_import(PREVIOUS_VERSION, "30").validate().unwrap_err();
        assert_eq!(err.field, "newCodeDefinitionValue");
        assert!(azure_import(PREVIOUS_VERSION, "").validate().is_ok());
    }

    #[test]
    fn import_azure_checks_fields_in_order() {
        let err = ImportAzureProjectOptions::default().validate().unwrap_err();
        assert_eq!(err.field, "projectName");

        let err = ImportAzureProjectOptions {
            project_name: "p".to_owned(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "repositoryName");
    }

    #[tokio::test]
    async fn import_azure_project_decodes_created_project() {
        let json = r#"
        {
          "project": {
            "key": "my-project",
            "name": "My Project",
            "qualifier": "TRK",
            "visibility": "private"
          }
        }
        "#;
        let transport = FakeTransport::new(200, json);
        let client = transport.client();

        let response = client
            .alm_integrations()
            .import_azure_project(&azure_import("NUMBER_OF_DAYS", "30"))
            .await
            .unwrap();
        assert_eq!(response.value.project.key, "my-project");
        assert_eq!(response.value.project.visibility, "private");

        let request = transport.last_request();
        assert_eq!(request.param("newCodeDefinitionType"), Some("NUMBER_OF_DAYS"));
        assert_eq!(request.param("newCodeDefinitionValue"), Some("30"));
    }

    #[test]
    fn required_fields_of_imports() {
        assert_eq!(
            ImportBitbucketCloudRepoOptions::default()
                .validate()
                .unwrap_err()
                .field,
            "repositorySlug"
        );
        assert_eq!(
            ImportBitbucketServerProjectOptions::default()
                .validate()
                .unwrap_err()
                .field,
            "projectKey"
        );
        assert_eq!(
            ImportBitbucketServerProjectOptions {
                project_key: "PRJ".to_owned(),
                ..Default::default()
            }
            .validate()
            .unwrap_err()
            .field,
            "repositorySlug"
        );
        assert_eq!(
            ImportGitlabProjectOptions::default()
                .validate()
                .unwrap_err()
                .field,
            "gitlabProjectId"
        );
        assert_eq!(
            ListGithubRepositoriesOptions::default()
                .validate()
                .unwrap_err()
                .field,
            "organization"
        );
    }

    #[test]
    fn github_repository_key_bound() {
        let mut options = ImportGithubProjectOptions {
            repository_key: "k".repeat(GITHUB_REPOSITORY_KEY_MAX_LENGTH),
            ..Default::default()
        };
        assert!(options.validate().is_ok());
        options.repository_key.push('k');
        let err = options.validate().unwrap_err();
        assert_eq!(err.field, "repositoryKey");
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn alm_listing_page_size_is_capped_at_100() {
        let options = SearchGitlabReposOptions {
            pagination: PaginationArgs::new(1, 100),
            ..Default::default()
        };
        assert!(options.validate().is_ok());

        let options = SearchBitbucketCloudReposOptions {
            pagination: PaginationArgs::new(1, 101),
            ..Default::default()
        };
        assert_eq!(options.validate().unwrap_err().field, "ps");
    }

    #[tokio::test]
    async fn search_bitbucketcloud_repos_sends_query_and_decodes() {
        let json = r#"
        {
          "isLastPage": true,
          "paging": {"pageIndex": 1, "pageSize": 50},
          "repositories": [
            {"slug": "banana", "name": "banana", "uuid": "{b}", "workspace": "fruits",
             "projectKey": "FRU", "sqProjectKey": "fruits_banana"}
          ]
        }
        "#;
        let transport = FakeTransport::new(200, json);
        let client = transport.client();

        let response = client
            .alm_integrations()
            .search_bitbucketcloud_repos(&SearchBitbucketCloudReposOptions {
                alm_setting: Some("x".to_owned()),
                repository_name: None,
                pagination: PaginationArgs {
                    page: None,
                    page_size: Some(50),
                },
            })
            .await
            .unwrap();
        assert!(response.value.is_last_page);
        assert_eq!(response.value.paging.page_size, 50);
        assert_eq!(
            response.value.repositories[0].sq_project_key.as_deref(),
            Some("fruits_banana")
        );

        let request = transport.last_request();
        assert_eq!(
            request.params,
            vec![
                ("almSetting".to_owned(), "x".to_owned()),
                ("ps".to_owned(), "50".to_owned()),
            ]
        );
    }
}
