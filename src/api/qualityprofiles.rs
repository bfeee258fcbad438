//! `api/qualityprofiles`: quality profile search, lifecycle, rule activation
//! and XML backup.

use serde::Deserialize;

use crate::api::issues::SEVERITIES;
use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    ValidationError, is_value_authorized, optional, validate_max_length, validate_required,
};
use crate::transport::{
    Endpoint, Method, Params, TransportError, decode_empty, decode_json, decode_text,
};

pub const PROFILE_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityProfile {
    pub key: String,
    pub name: String,
    pub language: String,
    pub language_name: String,
    pub is_inherited: bool,
    pub is_default: bool,
    pub is_built_in: bool,
    pub parent_key: Option<String>,
    pub parent_name: Option<String>,
    pub active_rule_count: u64,
    pub active_deprecated_rule_count: u64,
    pub project_count: Option<u64>,
    pub rules_updated_at: Option<String>,
    pub last_used: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchProfilesResponse {
    pub profiles: Vec<QualityProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchProfilesOptions {
    /// Only return default profiles.
    pub defaults: Option<bool>,
    pub language: Option<String>,
    pub project: Option<String>,
    pub quality_profile: Option<String>,
}

impl Endpoint for SearchProfilesOptions {
    type Output = SearchProfilesResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "qualityprofiles/search";

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_opt("defaults", self.defaults)
            .push_opt("language", self.language.as_deref())
            .push_opt("project", self.project.as_deref())
            .push_opt("qualityProfile", self.quality_profile.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateProfileResponse {
    pub profile: QualityProfile,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateProfileOptions {
    pub language: String,
    pub name: String,
}

impl Endpoint for CreateProfileOptions {
    type Output = CreateProfileResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualityprofiles/create";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.language, "language")?;
        validate_required(&self.name, "name")?;
        validate_max_length(&self.name, PROFILE_NAME_MAX_LENGTH, "name")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("language", &self.language)
            .push("name", &self.name);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Identifies a profile by language and name.
pub struct ProfileRef {
    pub language: String,
    pub quality_profile: String,
}

impl ProfileRef {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.language, "language")?;
        validate_required(&self.quality_profile, "qualityProfile")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("language", &self.language)
            .push("qualityProfile", &self.quality_profile);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteProfileOptions(pub ProfileRef);

impl Endpoint for DeleteProfileOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualityprofiles/delete";

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
pub struct SetDefaultProfileOptions(pub ProfileRef);

impl Endpoint for SetDefaultProfileOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualityprofiles/set_default";

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
/// Export of a profile as the server's XML backup document.
pub struct BackupProfileOptions(pub ProfileRef);

impl Endpoint for BackupProfileOptions {
    type Output = String;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "qualityprofiles/backup";

    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate()
    }

    fn params(&self) -> Params {
        self.0.params()
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_text(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivateRuleOptions {
    /// Quality profile key.
    pub key: String,
    pub rule: String,
    pub severity: Option<String>,
    /// Reset severity and parameters to the parent profile values.
    pub reset: Option<bool>,
    /// Rule parameters as `(key, value)`; sent as `k1=v1;k2=v2`.
    pub params: Vec<(String, String)>,
}

impl Endpoint for ActivateRuleOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "qualityprofiles/activate_rule";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.key, "key")?;
        validate_required(&self.rule, "rule")?;
        optional(self.severity.as_deref().filter(|it| !it.is_empty()), |it| {
            is_value_authorized(it, SEVERITIES, "severity")
        })
    }

    fn params(&self) -> Params {
        let rule_params = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(";");
        let mut params = Params::new();
        params
            .push("key", &self.key)
            .push("rule", &self.rule)
            .push_opt("severity", self.severity.as_deref())
            .push_opt("reset", self.reset)
            .push_str("params", &rule_params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_empty(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/qualityprofiles`.
pub struct QualityProfiles<'a> {
    client: &'a SonarClient,
}

impl<'a> QualityProfiles<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        options: &SearchProfilesOptions,
    ) -> Result<Response<SearchProfilesResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn create(
        &self,
        options: &CreateProfileOptions,
    ) -> Result<Response<CreateProfileResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn delete(&self, options: &DeleteProfileOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn set_default(
        &self,
        options: &SetDefaultProfileOptions,
    ) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    /// Download the XML backup of a profile.
    pub async fn backup(
        &self,
        options: &BackupProfileOptions,
    ) -> Result<Response<String>, SonarError> {
        self.client.call(options).await
    }

    pub async fn activate_rule(
        &self,
        options: &ActivateRuleOptions,
    ) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }
}
