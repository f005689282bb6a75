use b1_client::prelude::*;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    info!("Starting business partners example");

    // Login, query, logout in one shot
    let client = SessionClient::run(ClientConfig::new(), NamedAction::BusinessPartners, true).await?;

    match client.get_response() {
        Some(serde_json::Value::Array(partners)) => {
            info!("✓ Retrieved {} business partners", partners.len());
            for partner in partners {
                info!(
                    "{} ({})",
                    partner["CardCode"].as_str().unwrap_or("-"),
                    partner["CardType"].as_str().unwrap_or("-")
                );
            }
        }
        _ => warn!("No business partners returned"),
    }

    Ok(())
}
