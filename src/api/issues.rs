//! `api/issues`: issue search and the single-issue workflow actions.

use serde::Deserialize;

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{
    Page, PaginationArgs, Paging, ValidationError, is_value_authorized, validate_in_slice,
    validate_required,
};
use crate::transport::{Endpoint, Method, Paginated, Params, TransportError, decode_json};

pub const SEVERITIES: &[&str] = &["INFO", "MINOR", "MAJOR", "CRITICAL", "BLOCKER"];
pub const ISSUE_TYPES: &[&str] = &["CODE_SMELL", "BUG", "VULNERABILITY"];
pub const ISSUE_STATUSES: &[&str] = &[
    "OPEN",
    "CONFIRMED",
    "REOPENED",
    "RESOLVED",
    "CLOSED",
    "ACCEPTED",
];
pub const TRANSITIONS: &[&str] = &[
    "confirm",
    "unconfirm",
    "reopen",
    "resolve",
    "falsepositive",
    "wontfix",
    "close",
    "accept",
];

fn validate_each(
    values: &[String],
    allowed: &[&str],
    field: &'static str,
) -> Result<(), ValidationError> {
    values
        .iter()
        .try_for_each(|value| validate_in_slice(value, allowed, field))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextRange {
    pub start_line: u32,
    pub end_line: u32,
    pub start_offset: u32,
    pub end_offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub key: String,
    pub login: String,
    pub html_text: String,
    pub markdown: String,
    pub updatable: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Issue {
    pub key: String,
    pub rule: String,
    pub severity: String,
    pub component: String,
    pub project: String,
    pub line: Option<u32>,
    pub hash: Option<String>,
    pub text_range: Option<TextRange>,
    pub status: String,
    pub resolution: Option<String>,
    pub message: String,
    pub effort: Option<String>,
    pub debt: Option<String>,
    pub assignee: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub transitions: Vec<String>,
    pub actions: Vec<String>,
    pub comments: Vec<Comment>,
    pub creation_date: String,
    pub update_date: String,
    #[serde(rename = "type")]
    pub issue_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueComponent {
    pub key: String,
    pub enabled: bool,
    pub qualifier: String,
    pub name: String,
    pub long_name: String,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchIssuesResponse {
    pub total: u64,
    pub p: u32,
    pub ps: u32,
    pub paging: Paging,
    pub issues: Vec<Issue>,
    pub components: Vec<IssueComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIssuesOptions {
    pub additional_fields: Vec<String>,
    pub assigned: Option<bool>,
    pub assignees: Vec<String>,
    pub author: Vec<String>,
    pub component_keys: Vec<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub issues: Vec<String>,
    pub languages: Vec<String>,
    pub resolved: Option<bool>,
    pub rules: Vec<String>,
    pub severities: Vec<String>,
    pub statuses: Vec<String>,
    pub tags: Vec<String>,
    pub types: Vec<String>,
    pub sort: Option<String>,
    pub ascending: Option<bool>,
    pub pagination: PaginationArgs,
}

impl Endpoint for SearchIssuesOptions {
    type Output = SearchIssuesResponse;

    const METHOD: Method = Method::Get;
    const PATH: &'static str = "issues/search";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_each(&self.severities, SEVERITIES, "severities")?;
        validate_each(&self.statuses, ISSUE_STATUSES, "statuses")?;
        validate_each(&self.types, ISSUE_TYPES, "types")?;
        self.pagination.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push_comma("additionalFields", &self.additional_fields)
            .push_opt("assigned", self.assigned)
            .push_comma("assignees", &self.assignees)
            // `author` is the only multi-value parameter sent as repeated keys.
            .push_repeated("author", &self.author)
            .push_comma("componentKeys", &self.component_keys)
            .push_opt("createdAfter", self.created_after.as_deref())
            .push_opt("createdBefore", self.created_before.as_deref())
            .push_comma("issues", &self.issues)
            .push_comma("languages", &self.languages)
            .push_opt("resolved", self.resolved)
            .push_comma("rules", &self.rules)
            .push_comma("severities", &self.severities)
            .push_comma("statuses", &self.statuses)
            .push_comma("tags", &self.tags)
            .push_comma("types", &self.types)
            .push_opt("s", self.sort.as_deref())
            .push_opt("asc", self.ascending)
            .push_pagination(&self.pagination);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

impl Paginated for SearchIssuesOptions {
    type Item = Issue;

    fn with_page(&self, page: u32) -> Self {
        Self {
            pagination: self.pagination.with_page(page),
            ..self.clone()
        }
    }

    fn into_page(output: Self::Output) -> Page<Self::Item> {
        let total = if output.paging.total > 0 {
            output.paging.total
        } else {
            output.total
        };
        Page {
            items: output.issues,
            total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
/// Response of the single-issue actions: the issue after the change.
pub struct IssueResponse {
    pub issue: Issue,
    pub components: Vec<IssueComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCommentOptions {
    pub issue: String,
    pub text: String,
}

impl Endpoint for AddCommentOptions {
    type Output = IssueResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "issues/add_comment";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.issue, "issue")?;
        validate_required(&self.text, "text")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("issue", &self.issue).push("text", &self.text);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignOptions {
    pub issue: String,
    /// `None` unassigns the issue.
    pub assignee: Option<String>,
}

impl Endpoint for AssignOptions {
    type Output = IssueResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "issues/assign";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.issue, "issue")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("issue", &self.issue)
            .push_opt("assignee", self.assignee.as_deref());
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoTransitionOptions {
    pub issue: String,
    pub transition: String,
}

impl Endpoint for DoTransitionOptions {
    type Output = IssueResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "issues/do_transition";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.issue, "issue")?;
        validate_required(&self.transition, "transition")?;
        is_value_authorized(&self.transition, TRANSITIONS, "transition")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("issue", &self.issue)
            .push("transition", &self.transition);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetSeverityOptions {
    pub issue: String,
    pub severity: String,
}

impl Endpoint for SetSeverityOptions {
    type Output = IssueResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "issues/set_severity";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.issue, "issue")?;
        validate_required(&self.severity, "severity")?;
        is_value_authorized(&self.severity, SEVERITIES, "severity")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("issue", &self.issue)
            .push("severity", &self.severity);
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetTagsOptions {
    pub issue: String,
    /// An empty list removes every tag.
    pub tags: Vec<String>,
}

impl Endpoint for SetTagsOptions {
    type Output = IssueResponse;

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "issues/set_tags";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.issue, "issue")
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params
            .push("issue", &self.issue)
            .push("tags", self.tags.join(","));
        params
    }

    fn decode(body: &str) -> Result<Self::Output, TransportError> {
        decode_json(body)
    }
}

#[derive(Debug, Clone, Copy)]
/// Handle for `api/issues`.
pub struct Issues<'a> {
    client: &'a SonarClient,
}

impl<'a> Issues<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        options: &SearchIssuesOptions,
    ) -> Result<Response<SearchIssuesResponse>, SonarError> {
        self.client.call(options).await
    }

    /// Collect every issue matching `options`, across all pages.
    pub async fn search_all(
        &self,
        options: &SearchIssuesOptions,
    ) -> Result<Vec<Issue>, SonarError> {
        self.client.search_all(options).await
    }

    pub async fn add_comment(
        &self,
        options: &AddCommentOptions,
    ) -> Result<Response<IssueResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn assign(
        &self,
        options: &AssignOptions,
    ) -> Result<Response<IssueResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn do_transition(
        &self,
        options: &DoTransitionOptions,
    ) -> Result<Response<IssueResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn set_severity(
        &self,
        options: &SetSeverityOptions,
    ) -> Result<Response<IssueResponse>, SonarError> {
        self.client.call(options).await
    }

    pub async fn set_tags(
        &self,
        options: &SetTagsOptions,
    ) -> Result<Response<IssueResponse>, SonarError> {
        self.client.call(options).await
    }
}
