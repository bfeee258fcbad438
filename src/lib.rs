//! Typed Rust client for the SonarQube Web API.
//!
//! The crate is split into a domain layer of validation rules and shared
//! types, a transport layer describing each operation as an [`Endpoint`]
//! (method, path, parameters, response decoding), a client layer that
//! dispatches endpoints over HTTP, and one `api` module per Web API resource.
//!
//! Every option is validated before anything is sent; a rejected option yields
//! [`SonarError::Validation`] naming the offending wire parameter.
//!
//! ```rust,no_run
//! use sonarqube_client::api::issues::SearchIssuesOptions;
//! use sonarqube_client::{Auth, PaginationArgs, SonarClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sonarqube_client::SonarError> {
//!     let client = SonarClient::new("https://sonar.example.com", Auth::token("squ_...")?)?;
//!     let options = SearchIssuesOptions {
//!         component_keys: vec!["my-project".to_owned()],
//!         pagination: PaginationArgs::new(1, 100),
//!         ..Default::default()
//!     };
//!     let issues = client.issues().search_all(&options).await?;
//!     println!("{} issues", issues.len());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod domain;
pub mod transport;

pub use client::{Auth, Response, SonarClient, SonarClientBuilder, SonarError};
pub use domain::{Page, PaginationArgs, Paging, ValidationError, ValidationErrorKind};
pub use transport::{Endpoint, Method, Paginated, Params};
