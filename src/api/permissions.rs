//! `api/permissions`: grant and revoke global or project permissions.

use crate::client::{Response, SonarClient, SonarError};
use crate::domain::{ValidationError, is_value_authorized, validate_required};
use crate::transport::{Endpoint, Method, Params, TransportError, decode_empty};

pub const GLOBAL_PERMISSIONS: &[&str] = &[
    "admin",
    "gateadmin",
    "profileadmin",
    "provisioning",
    "scan",
    "applicationcreator",
    "portfoliocreator",
];
pub const PROJECT_PERMISSIONS: &[&str] = &[
    "admin",
    "codeviewer",
    "issueadmin",
    "securityhotspotadmin",
    "scan",
    "user",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Permission plus optional project scope. Without a project the permission is global.
pub struct PermissionScope {
    pub permission: String,
    pub project_id: Option<String>,
    pub project_key: Option<String>,
}

impl PermissionScope {
    fn is_project_scoped(&self) -> bool {
        [&self.project_id, &self.project_key]
            .iter()
            .any(|it| it.as_deref().is_some_and(|value| !value.is_empty()))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.permission, "permission")?;
        let allowed = if self.is_project_scoped() {
            PROJECT_PERMISSIONS
        } else {
            GLOBAL_PERMISSIONS
        };
        is_value_authorized(&self.permission, allowed, "permission")
    }

    fn push_params(&self, params: &mut Params) {
        params
            .push("permission", &self.permission)
            .push_opt("projectId", self.project_id.as_deref())
            .push_opt("projectKey", self.project_key.as_deref());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPermissionOptions {
    pub login: String,
    pub scope: PermissionScope,
}

impl UserPermissionOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.login, "login")?;
        self.scope.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("login", &self.login);
        self.scope.push_params(&mut params);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPermissionOptions {
    pub group_name: String,
    pub scope: PermissionScope,
}

impl GroupPermissionOptions {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.group_name, "groupName")?;
        self.scope.validate()
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.push("groupName", &self.group_name);
        self.scope.push_params(&mut params);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddUserOptions(pub UserPermissionOptions);

impl Endpoint for AddUserOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "permissions/add_user";

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
pub struct RemoveUserOptions(pub UserPermissionOptions);

impl Endpoint for RemoveUserOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "permissions/remove_user";

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
pub struct AddGroupOptions(pub GroupPermissionOptions);

impl Endpoint for AddGroupOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "permissions/add_group";

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
pub struct RemoveGroupOptions(pub GroupPermissionOptions);

impl Endpoint for RemoveGroupOptions {
    type Output = ();

    const METHOD: Method = Method::Post;
    const PATH: &'static str = "permissions/remove_group";

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
/// Handle for `api/permissions`.
pub struct Permissions<'a> {
    client: &'a SonarClient,
}

impl<'a> Permissions<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
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

    pub async fn add_group(&self, options: &AddGroupOptions) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }

    pub async fn remove_group(
        &self,
        options: &RemoveGroupOptions,
    ) -> Result<Response<()>, SonarError> {
        self.client.call(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;
    use crate::domain::ValidationErrorKind;

    fn scope(permission: &str, project_key: Option<&str>) -> PermissionScope {
        PermissionScope {
            permission: permission.to_owned(),
            project_id: None,
            project_key: project_key.map(str::to_owned),
        }
    }

    #[test]
    fn permission_set_depends_on_scope() {
        assert!(scope("gateadmin", None).validate().is_ok());
        let err = scope("gateadmin", Some("my-project")).validate().unwrap_err();
        assert_eq!(err.field, "permission");
        assert_eq!(err.kind, ValidationErrorKind::InvalidValue);

        assert!(scope("codeviewer", Some("my-project")).validate().is_ok());
        assert!(scope("codeviewer", None).validate().is_err());
        assert!(scope("codeviewer", Some("")).validate().is_err());
    }

    #[test]
    fn every_listed_permission_is_accepted_in_its_scope() {
        for permission in GLOBAL_PERMISSIONS {
            assert!(scope(permission, None).validate().is_ok(), "{permission}");
        }
        for permission in PROJECT_PERMISSIONS {
            let options = scope(permission, Some("my-project"));
            assert!(options.validate().is_ok(), "{permission}");
        }
    }

    #[test]
    fn login_is_checked_before_permission() {
        let err = AddUserOptions::default().validate().unwrap_err();
        assert_eq!(err.field, "login");
        let err = RemoveGroupOptions(GroupPermissionOptions {
            group_name: "devs".to_owned(),
            scope: PermissionScope::default(),
        })
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "permission");
        assert_eq!(err.kind, ValidationErrorKind::MissingRequired);
    }

    #[tokio::test]
    async fn add_group_posts_scope() {
        let transport = FakeTransport::new(204, "");
        let client = transport.client();

        client
            .permissions()
            .add_group(&AddGroupOptions(GroupPermissionOptions {
                group_name: "devs".to_owned(),
                scope: scope("issueadmin", Some("my-project")),
            }))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.path, "/api/permissions/add_group");
        assert_eq!(request.param("groupName"), Some("devs"));
        assert_eq!(request.param("permission"), Some("issueadmin"));
        assert_eq!(request.param("projectKey"), Some("my-project"));
        assert_eq!(request.param("projectId"), None);
    }
}
