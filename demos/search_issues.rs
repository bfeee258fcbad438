use std::io;

use sonarqube_client::api::issues::SearchIssuesOptions;
use sonarqube_client::{PaginationArgs, SonarClientBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project = std::env::var("SONAR_PROJECT_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SONAR_PROJECT_KEY environment variable is required",
        )
    })?;

    let client = SonarClientBuilder::from_env()?.build()?;
    let options = SearchIssuesOptions {
        component_keys: vec![project],
        resolved: Some(false),
        pagination: PaginationArgs::new(1, 100),
        ..Default::default()
    };
    let issues = client.issues().search_all(&options).await?;

    for issue in &issues {
        println!(
            "{:<10} {:<14} {}:{} {}",
            issue.severity,
            issue.issue_type,
            issue.component,
            issue.line.unwrap_or_default(),
            issue.message
        );
    }
    println!("{} open issues", issues.len());

    Ok(())
}
