//! `api/projects`: project provisioning, deletion and search.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    Page, PaginationArgs, Paging, ValidationError, optional, validate_in_slice,
    validate_max_length, validate_required,
};
use crate::transport::{
    Endpoint, Method, Paginated, Params, TransportError, decode_empty, decode_json,
};

pub const PROJECT_NAME_MAX_LENGTH: usize = 500;
pub const PROJECT_KEY_MAX_LENGTH: usize = 400;
pub const VISIBILITIES: &[&str] = &["private", "public"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
/// Project returned by creation and import endpoints.
pub struct CreatedProject {
    pub key: String,
    pub name: String,
    pub qualifier: String,
    pub visibility: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateProjectResponse {
    pub project: CreatedProject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateProjectOptions {
    pub name: String,
    pub project: String,
    pub main_branch: Option<String>,
    pub visibility: Option<String>,
}

impl Endpoint for CreateProjectOptions {
    type Output = CreateProjectResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "projects/create";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")?;
        validate_max_length(&self.name, PROJECT_NAME_MAX_LENGTH, "name")?;
        validate_required(&self.project, "project")?;
        validate_max_length(&self.project, PROJECT_KEY_MAX_LENGTH, "project")?;
        optional(self.visibility.as_deref(), |it| {
            validate_in_slice(it, VISIBILITIES, "visibility")
        })
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("name", &self.name)
            .push("project", &self.project)
            .push_opt("mainBranch", self.main_branch.as_deref())
            .push_opt("visibility", self.visibility.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteProjectOptions {
    pub project: String,
}

impl Endpoint for DeleteProjectOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "projects/delete";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.project, "project")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("project", &self.project);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectComponent {
    pub key: String,
    pub name: String,
    pub qualifier: String,
    pub visibility: String,
    pub last_analysis_date: Option<String>,
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchProjectsResponse {
    pub paging: Paging,
    pub components: Vec<ProjectComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchProjectsOptions {
    pub query: Option<String>,
    /// Restrict to these project keys (comma-joined on the wire).
    pub projects: Vec<String>,
    pub analyzed_before: Option<String>,
    pub on_provisioned_only: Option<bool>,
    pub pagination: PaginationArgs,
}

impl Endpoint for SearchProjectsOptions {
    type Output = SearchProjectsResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "projects/search";

    fn validate(&self) -> Result<(), ValidationError> {
        self.pagination.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("q", self.query.as_deref())
            .push_comma("projects", &self.projects)
            .push_opt("analyzedBefore", self.analyzed_before.as_deref())
            .push_opt("onProvisionedOnly", self.on_provisioned_only)
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

impl Paginated for SearchProjectsOptions {
    type Item = ProjectComponent;

    fn with_page(&self, page: u32) -> Self {
        Self {
            pagination: self.pagination.with_page(page),
            ..self.clone()
        }
    }

    fn into_page(output: Self::Output) -> Page<Self::Item> {
        Page {
            items: output.components,
            total: output.paging.total,
        }
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/projects`.
pub struct Projects<'a> {
    client: &'a SonarClient,
}

impl<'a> Projects<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        options: &CreateProjectOptions,
    ) -> Result<Response<CreateProjectResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn delete(&self, options: &DeleteProjectOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn search(
        &self,
        options: &SearchProjectsOptions,
    ) -> Result<Response<SearchProjectsResponse>, SonarError> {
        self.client.call(options).await
    }

    /// Collect every project matching `options`, across all pages.
    pub async fn search_all(
        &self,
        options: &SearchProjectsOptions,
    ) -> Result<Vec<ProjectComponent>, SonarError> {
        self.client.search_all(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;
    use crate::domain::ValidationErrorKind;
    use serde_json::json;

    #[test]
    fn create_requires_name_then_project() {
        let err = CreateProjectOptions::default().validate().unwrap_err();
        assert_eq!(err.field, "name");

        let err = CreateProjectOptions {
            name: "n".to_owned(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "project");
        assert_eq!(err.kind, ValidationErrorKind::MissingRequired);
    }

    #[test]
    fn create_checks_visibility_and_lengths() {
        let mut options = CreateProjectOptions {
            name: "n".repeat(PROJECT_NAME_MAX_LENGTH),
            project: "k".repeat(PROJECT_KEY_MAX_LENGTH),
            main_branch: None,
            visibility: Some("PUBLIC".to_owned()),
        };
        assert!(options.validate().is_ok());
        for visibility in VISIBILITIES {
            options.visibility = Some((*visibility).to_owned());
            assert!(options.validate().is_ok(), "{visibility}");
        }

        options.visibility = Some("internal".to_owned());
        let err = options.validate().unwrap_err();
        assert_eq!(err.field, "visibility");
        assert_eq!(err.kind, ValidationErrorKind::InvalidValue);

        options.visibility = None;
        options.project.push('k');
        assert_eq!(options.validate().unwrap_err().field, "project");
    }

    #[tokio::test]
    async fn search_encodes_project_list_with_commas() {
        let transport = FakeTransport::new(200, r#"{"paging":{"total":0},"components":[]}"#);
        let client = transport.client();

        client
            .projects()
            .search(&SearchProjectsOptions {
                projects: vec!["a".to_owned(), "b".to_owned()],
                on_provisioned_only: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.param("projects"), Some("a,b"));
        assert_eq!(request.param("onProvisionedOnly"), Some("true"));
        assert_eq!(request.param("p"), None);
    }

    #[tokio::test]
    async fn search_all_collects_every_page() {
        let page = |index: u32, keys: &[&str]| {
            let components = keys
                .iter()
                .map(|key| json!({"key": key, "name": key}))
                .collect::<Vec<_>>();
            let body = json!({
                "paging": {"pageIndex": index, "pageSize": 2, "total": 3},
                "components": components
            });
            (200, body.to_string())
        };
        let transport =
            FakeTransport::with_responses(vec![page(1, &["a", "b"]), page(2, &["c"])]);
        let client = transport.client();

        let projects = client
            .projects()
            .search_all(&SearchProjectsOptions {
                pagination: PaginationArgs {
                    page: None,
                    page_size: Some(2),
                },
                ..Default::default()
            })
            .await
            .unwrap();
        let keys = projects.iter().map(|it| it.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.requests()[1].param("ps"), Some("2"));
    }
}
