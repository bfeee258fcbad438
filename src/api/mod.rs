//! One module per SonarQube Web API resource.
//!
//! Each module holds the options and response types of its operations plus a
//! borrowed handle (obtained from [`crate::SonarClient`]) exposing them as async
//! methods. Option types with the same name in different modules (for example
//! `AddUserOptions`) are told apart by module path.

pub mod alm_integrations;
pub mod alm_settings;
pub mod issues;
pub mod new_code_periods;
pub mod permissions;
pub mod project_badges;
pub mod projects;
pub mod qualitygates;
pub mod qualityprofiles;
pub mod system;
pub mod user_groups;
pub mod user_tokens;
pub mod users;
pub mod webhooks;

pub use alm_integrations::AlmIntegrations;
pub use alm_settings::AlmSettings;
pub use issues::Issues;
pub use new_code_periods::NewCodePeriods;
pub use permissions::Permissions;
pub use project_badges::ProjectBadges;
pub use projects::Projects;
pub use qualitygates::QualityGates;
pub use qualityprofiles::QualityProfiles;
pub use system::System;
pub use user_groups::UserGroups;
pub use user_tokens::UserTokens;
pub use users::Users;
pub use webhooks::Webhooks;
