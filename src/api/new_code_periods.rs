//! `api/new_code_periods`: per-instance, per-project or per-branch new-code definition.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    NEW_CODE_PERIOD_TYPES, NUMBER_OF_DAYS, PREVIOUS_VERSION, REFERENCE_BRANCH, SPECIFIC_ANALYSIS,
    ValidationError, ValidationErrorKind, is_value_authorized, validate_days, validate_required,
};
use crate::transport::{Endpoint, Method, Params, TransportError, decode_empty, decode_json};

/// Target of a new-code definition. Without a project the instance default is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodScope {
    pub project: Option<String>,
    /// Only meaningful together with `project`.
    pub branch: Option<String>,
}

impl PeriodScope {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.branch.as_deref().is_some_and(|it| !it.is_empty()) {
            validate_required(self.project.as_deref().unwrap_or_default(), "project")?;
        }
        Ok(())
    }

    fn push_params(&self, params: &mut Params) {
        params
            .push_opt("project", self.project.as_deref())
            .push_opt("branch", self.branch.as_deref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetNewCodePeriodOptions {
    pub scope: PeriodScope,
    /// One of [`NEW_CODE_PERIOD_TYPES`].
    pub period_type: String,
    /// Days for `NUMBER_OF_DAYS`, a branch name for `REFERENCE_BRANCH`, an
    /// analysis key for `SPECIFIC_ANALYSIS`. Must be empty for `PREVIOUS_VERSION`.
    pub value: Option<String>,
}

impl Endpoint for SetNewCodePeriodOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "new_code_periods/set";

    fn validate(&self) -> Result<(), ValidationError> {
        self.scope.validate()?;
        validate_required(&self.period_type, "type")?;
        is_value_authorized(&self.period_type, NEW_CODE_PERIOD_TYPES, "type")?;

        let value = self.value.as_deref().unwrap_or_default();
        match self.period_type.as_str() {
            NUMBER_OF_DAYS => validate_days(value, "value"),
            REFERENCE_BRANCH => validate_required(value, "value"),
            SPECIFIC_ANALYSIS => {
                validate_required(self.scope.branch.as_deref().unwrap_or_default(), "branch")?;
                validate_required(value, "value")
            }
            PREVIOUS_VERSION if !value.is_empty() => Err(ValidationError::new(
                "value",
                ValidationErrorKind::InvalidValue,
                format!("value must not be set when type is {PREVIOUS_VERSION}"),
            )),
            _ => Ok(()),
        }
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        self.scope.push_params(&mut params);
        params
            .push("type", &self.period_type)
            .push_opt("value", self.value.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCodePeriod {
    pub project_key: Option<String>,
    pub branch_key: Option<String>,
    #[serde(rename = "type")]
    pub period_type: String,
    pub value: Option<String>,
    pub effective_value: Option<String>,
    pub inherited: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowNewCodePeriodOptions(pub PeriodScope);

impl Endpoint for ShowNewCodePeriodOptions {
    type Output = NewCodePeriod;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "new_code_periods/show";

    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        self.0.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsetNewCodePeriodOptions(pub PeriodScope);

impl Endpoint for UnsetNewCodePeriodOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "new_code_periods/unset";

    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        self.0.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/new_code_periods`.
pub struct NewCodePeriods<'a> {
    client: &'a SonarClient,
}

impl<'a> NewCodePeriods<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn set(&self, options: &SetNewCodePeriodOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn show(
        &self,
        options: &ShowNewCodePeriodOptions,
    ) -> Result<Response<NewCodePeriod>, SonarError> {
        self.client.call(options).await
    }

    pub async fn unset(
        &self,
        options: &UnsetNewCodePeriodOptions,
    ) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }
}
