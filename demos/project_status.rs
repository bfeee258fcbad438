use std::io;

use sonarqube_client::SonarClientBuilder;
use sonarqube_client::api::qualitygates::ProjectStatusOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project = std::env::var("SONAR_PROJECT_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SONAR_PROJECT_KEY environment variable is required",
        )
    })?;

    let client = SonarClientBuilder::from_env()?.build()?;
    let options = ProjectStatusOptions {
        project_key: Some(project),
        branch: std::env::var("SONAR_BRANCH").ok(),
        ..Default::default()
    };
    let status = client
        .quality_gates()
        .project_status(&options)
        .await?
        .into_value()
        .project_status;

    println!("quality gate: {}", status.status);
    for condition in &status.conditions {
        println!(
            "  {:<6} {} {} {:?} (actual {:?})",
            condition.status,
            condition.metric_key,
            condition.comparator,
            condition.error_threshold,
            condition.actual_value
        );
    }

    Ok(())
}
