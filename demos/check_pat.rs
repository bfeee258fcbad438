use sonarqube_client::SonarClientBuilder;
use sonarqube_client::api::alm_integrations::CheckPatOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = SonarClientBuilder::from_env()?.build()?;
    let options = CheckPatOptions {
        alm_setting: std::env::var("SONAR_ALM_SETTING").ok(),
    };

    let response = client.alm_integrations().check_pat(&options).await?;
    println!("personal access token is valid (HTTP {})", response.status);

    Ok(())
}
