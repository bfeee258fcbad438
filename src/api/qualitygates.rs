//! `api/qualitygates`: quality gate management and project gate status.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    ValidationError, ValidationErrorKind, is_value_authorized, optional, validate_max_length,
    validate_required,
};
use crate::transport::{Endpoint, Method, Params, TransportError, decode_empty, decode_json};

pub const GATE_NAME_MAX_LENGTH: usize = 100;
pub const CONDITION_ERROR_MAX_LENGTH: usize = 64;
pub const CONDITION_OPERATORS: &[&str] = &["LT", "GT"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateGateResponse {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateGateOptions {
    pub name: String,
}

impl Endpoint for CreateGateOptions {
    type Output = CreateGateResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualitygates/create";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")?;
        validate_max_length(&self.name, GATE_NAME_MAX_LENGTH, "name")
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestroyGateOptions {
    pub name: String,
}

impl Endpoint for DestroyGateOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualitygates/destroy";

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
#[serde(rename_all = "camelCase", default)]
pub struct GateSummary {
    pub name: String,
    pub is_default: bool,
    pub is_built_in: bool,
    pub cayc_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListGatesResponse {
    pub qualitygates: Vec<GateSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGatesOptions;

impl Endpoint for ListGatesOptions {
    type Output = ListGatesResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "qualitygates/list";

    fn params(&self) -> Params {
        Params::new()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub id: String,
    pub metric: String,
    pub op: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowGateResponse {
    pub name: String,
    pub is_default: bool,
    pub is_built_in: bool,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowGateOptions {
    pub name: String,
}

impl Endpoint for ShowGateOptions {
    type Output = ShowGateResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "qualitygates/show";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, "name")
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameGateOptions {
    pub current_name: String,
    pub name: String,
}

impl Endpoint for RenameGateOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualitygates/rename";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.current_name, "currentName")?;
        validate_required(&self.name, "name")?;
        validate_max_length(&self.name, GATE_NAME_MAX_LENGTH, "name")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("currentName", &self.current_name)
            .push("name", &self.name);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectGateOptions {
    pub gate_name: String,
    pub project_key: String,
}

impl Endpoint for SelectGateOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualitygates/select";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.gate_name, "gateName")?;
        validate_required(&self.project_key, "projectKey")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("gateName", &self.gate_name)
            .push("projectKey", &self.project_key);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeselectGateOptions {
    pub project_key: String,
}

impl Endpoint for DeselectGateOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualitygates/deselect";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.project_key, "projectKey")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("projectKey", &self.project_key);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionStatus {
    pub status: String,
    pub metric_key: String,
    pub comparator: String,
    pub error_threshold: Option<String>,
    pub actual_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStatus {
    /// `OK`, `ERROR` or `NONE`.
    pub status: String,
    pub conditions: Vec<ConditionStatus>,
    pub ignored_conditions: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStatusResponse {
    pub project_status: ProjectStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One of `analysis_id`, `project_id` or `project_key` must be set.
pub struct ProjectStatusOptions {
    pub analysis_id: Option<String>,
    pub project_id: Option<String>,
    pub project_key: Option<String>,
    pub branch: Option<String>,
    pub pull_request: Option<String>,
}

impl Endpoint for ProjectStatusOptions {
    type Output = ProjectStatusResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "qualitygates/project_status";

    fn validate(&self) -> Result<(), ValidationError> {
        let provided = [&self.analysis_id, &self.project_id, &self.project_key]
            .into_iter()
            .any(|it| it.as_deref().is_some_and(|it| !it.is_empty()));
        if provided {
            return Ok(());
        }
        Err(ValidationError::new(
            "analysisId",
            ValidationErrorKind::MissingRequired,
            "one of analysisId, projectId or projectKey must be provided",
        ))
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("analysisId", self.analysis_id.as_deref())
            .push_opt("projectId", self.project_id.as_deref())
            .push_opt("projectKey", self.project_key.as_deref())
            .push_opt("branch", self.branch.as_deref())
            .push_opt("pullRequest", self.pull_request.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateConditionOptions {
    pub gate_name: String,
    pub metric: String,
    /// `LT` or `GT`; the server defaults to `GT`.
    pub op: Option<String>,
    pub error: String,
}

impl Endpoint for CreateConditionOptions {
    type Output = Condition;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualitygates/create_condition";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.gate_name, "gateName")?;
        validate_required(&self.metric, "metric")?;
        optional(self.op.as_deref().filter(|it| !it.is_empty()), |it| {
            is_value_authorized(it, CONDITION_OPERATORS, "op")
        })?;
        validate_required(&self.error, "error")?;
        validate_max_length(&self.error, CONDITION_ERROR_MAX_LENGTH, "error")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("gateName", &self.gate_name)
            .push("metric", &self.metric)
            .push_opt("op", self.op.as_deref())
            .push("error", &self.error);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/qualitygates`.
pub struct QualityGates<'a> {
    client: &'a SonarClient,
}

impl<'a> QualityGates<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        options: &CreateGateOptions,
    ) -> Result<Response<CreateGateResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn destroy(&self, options: &DestroyGateOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn list(&self) -> Result<Response<ListGatesResponse>, SonarError> {
        self.client.call(&ListGatesOptions).await
    }

    pub async fn show(
        &self,
        options: &ShowGateOptions,
    ) -> Result<Response<ShowGateResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn rename(&self, options: &RenameGateOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    /// Associate a project with a quality gate.
    pub async fn select(&self, options: &SelectGateOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    /// Put a project back on the default quality gate.
    pub async fn deselect(
        &self,
        options: &DeselectGateOptions,
    ) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn project_status(
        &self,
        options: &ProjectStatusOptions,
    ) -> Result<Response<ProjectStatusResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn create_condition(
        &self,
        options: &CreateConditionOptions,
    ) -> Result<Response<Condition>, SonarError> {
        self.client.call(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;

    #[test]
    fn gate_name_bound() {
        let mut options = CreateGateOptions {
            name: "g".repeat(GATE_NAME_MAX_LENGTH),
        };
        assert!(options.validate().is_ok());
        options.name.push('g');
        let err = options.validate().unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn rename_checks_current_name_first() {
        let err = RenameGateOptions::default().validate().unwrap_err();
        assert_eq!(err.field, "currentName");
    }

    #[test]
    fn project_status_requires_an_identifier() {
        let err = ProjectStatusOptions::default().validate().unwrap_err();
        assert_eq!(err.field, "analysisId");
        assert_eq!(err.kind, ValidationErrorKind::MissingRequired);
        assert!(err.message.contains("projectId"));
        assert!(err.message.contains("projectKey"));

        let err = ProjectStatusOptions {
            analysis_id: Some(String::new()),
            project_id: Some(String::new()),
            project_key: Some(String::new()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "analysisId");

        for options in [
            ProjectStatusOptions {
                analysis_id: Some("A".to_owned()),
                ..Default::default()
            },
            ProjectStatusOptions {
                project_id: Some("P".to_owned()),
                ..Default::default()
            },
            ProjectStatusOptions {
                project_key: Some("k".to_owned()),
                ..Default::default()
            },
        ] {
            assert!(options.validate().is_ok());
        }
    }

    #[test]
    fn create_condition_operator_and_order() {
        let base = CreateConditionOptions {
            gate_name: "gate".to_owned(),
            metric: "coverage".to_owned(),
            op: Some("LT".to_owned()),
            error: "80".to_owned(),
        };
        assert!(base.validate().is_ok());
        for op in CONDITION_OPERATORS {
            let options = CreateConditionOptions {
                op: Some((*op).to_owned()),
                ..base.clone()
            };
            assert!(options.validate().is_ok(), "{op}");
        }

        let err = CreateConditionOptions {
            op: Some("EQ".to_owned()),
            error: String::new(),
            ..base.clone()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "op");

        let err = CreateConditionOptions {
            error: "9".repeat(CONDITION_ERROR_MAX_LENGTH + 1),
            ..base
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "error");
    }

    #[tokio::test]
    async fn empty_operator_uses_server_default() {
        let transport = FakeTransport::new(200, r#"{"id":"1","metric":"coverage","error":"80"}"#);
        let client = transport.client();

        client
            .quality_gates()
            .create_condition(&CreateConditionOptions {
                gate_name: "gate".to_owned(),
                metric: "coverage".to_owned(),
                op: Some(String::new()),
                error: "80".to_owned(),
            })
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.param("metric"), Some("coverage"));
        assert_eq!(request.param("op"), None);
    }

    #[tokio::test]
    async fn project_status_decodes_conditions() {
        let json = r#"
        {
          "projectStatus": {
            "status": "ERROR",
            "ignoredConditions": false,
            "conditions": [
              {"status": "ERROR", "metricKey": "new_coverage", "comparator": "LT",
               "errorThreshold": "85", "actualValue": "82.5"}
            ]
          }
        }
        "#;
        let transport = FakeTransport::new(200, json);
        let client = transport.client();

        let response = client
            .quality_gates()
            .project_status(&ProjectStatusOptions {
                project_key: Some("my-project".to_owned()),
                branch: Some("main".to_owned()),
                ..Default::default()
            })
            .await
            .unwrap();
        let status = response.value.project_status;
        assert_eq!(status.status, "ERROR");
        assert_eq!(status.conditions[0].actual_value.as_deref(), Some("82.5"));

        let request = transport.last_request();
        assert_eq!(request.path, "/api/qualitygates/project_status");
        assert_eq!(request.param("projectKey"), Some("my-project"));
        assert_eq!(request.param("branch"), Some("main"));
        assert_eq!(request.param("projectId"), None);
    }

    #[tokio::test]
    async fn list_sends_no_params() {
        let json = r#"{"qualitygates":[{"name":"Sonar way","isDefault":true,"isBuiltIn":true}]}"#;
        let transport = FakeTransport::new(200, json);
        let client = transport.client();

        let response = client.quality_gates().list().await.unwrap();
        assert!(response.value.qualitygates[0].is_default);
        assert!(transport.last_request().params.is_empty());
    }
}
