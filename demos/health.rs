use std::time::Duration;

use sonarqube_client::SonarClientBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = SonarClientBuilder::from_env()?
        .timeout(Duration::from_secs(10))
        .build()?;
    let system = client.system();

    println!("ping: {}", system.ping().await?.value.trim());
    let status = system.status().await?.into_value();
    println!("status: {} (version {})", status.status, status.version);

    let health = system.health().await?.into_value();
    println!("health: {}", health.health);
    for cause in &health.causes {
        println!("  {}", cause.message);
    }

    Ok(())
}
