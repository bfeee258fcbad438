//! `api/project_badges`: SVG badges for a project's measures and quality gate.

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{ValidationError, is_value_authorized, validate_required};
use crate::transport::{Endpoint, Method, Params, TransportError, decode_text};

pub const BADGE_METRICS: &[&str] = &[
    "coverage",
    "duplicated_lines_density",
    "ncloc",
    "alert_status",
    "bugs",
    "code_smells",
    "vulnerabilities",
    "security_hotspots",
    "sqale_index",
    "sqale_rating",
    "reliability_rating",
    "security_rating",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeTarget {
    pub project: String,
    pub branch: Option<String>,
    /// Project badge token, needed for private projects.
    pub token: Option<String>,
}

impl BadgeTarget {
    fn push_params(&self, params: &mut Params) {
        params
            .push("project", &self.project)
            .push_opt("branch", self.branch.as_deref())
            .push_opt("token", self.token.as_deref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasureBadgeOptions {
    pub target: BadgeTarget,
    /// One of [`BADGE_METRICS`].
    pub metric: String,
}

impl Endpoint for MeasureBadgeOptions {
    /// SVG document.
    type Output = String;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "project_badges/measure";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.target.project, "project")?;
        validate_required(&self.metric, "metric")?;
        is_value_authorized(&self.metric, BADGE_METRICS, "metric")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        self.target.push_params(&mut params);
        params.push("metric", &self.metric);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_text(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityGateBadgeOptions(pub BadgeTarget);

impl Endpoint for QualityGateBadgeOptions {
    type Output = String;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "project_badges/quality_gate";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.0.project, "project")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        self.0.push_params(&mut params);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_text(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/project_badges`.
pub struct ProjectBadges<'a> {
    client: &'a SonarClient,
}

impl<'a> ProjectBadges<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn measure(
        &self,
        options: &MeasureBadgeOptions,
    ) -> Result<Response<String>, SonarError> {
        self.client.call(options).await
    }

    pub async fn quality_gate(
        &self,
        options: &QualityGateBadgeOptions,
    ) -> Result<Response<String>, SonarError> {
        self.client.call(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;
    use crate::domain::ValidationErrorKind;

    fn target() -> BadgeTarget {
        BadgeTarget {
            project: "my-project".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn metric_must_be_known() {
        for metric in BADGE_METRICS {
            let options = MeasureBadgeOptions {
                target: target(),
                metric: (*metric).to_owned(),
            };
            assert!(options.validate().is_ok(), "{metric}");
        }

        let err = MeasureBadgeOptions {
            target: target(),
            metric: "lines".to_owned(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "metric");
        assert_eq!(err.kind, ValidationErrorKind::InvalidValue);

        let err = MeasureBadgeOptions {
            target: target(),
            metric: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingRequired);
    }

    #[tokio::test]
    async fn quality_gate_returns_svg_verbatim() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>passed</text></svg>"#;
        let transport = FakeTransport::new(200, svg);
        let client = transport.client();

        let response = client
            .project_badges()
            .quality_gate(&QualityGateBadgeOptions(BadgeTarget {
                token: Some("sqb_abc".to_owned()),
                ..target()
            }))
            .await
            .unwrap();
        assert_eq!(response.value, svg);

        let request = transport.last_request();
        assert_eq!(request.path, "/api/project_badges/quality_gate");
        assert_eq!(request.param("token"), Some("sqb_abc"));
    }
}
