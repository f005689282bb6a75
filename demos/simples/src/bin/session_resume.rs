use b1_client::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    // First client opens the session
    let mut first = SessionClient::connect(ClientConfig::new().strict(true)).await?;
    info!("Session state: {:?}", first.auth_state());

    let settings = first.settings();
    info!("Captured session: {}", settings.session);

    // Second client reuses it without logging in again
    let mut second = SessionClient::from_settings_with_config(settings, first.config().clone())?;
    second
        .get("Items", &[("$select", "ItemCode,ItemName"), ("$top", "5")])
        .await?;
    info!("Items: {:#?}", second.get_response());
    info!("Calls on resumed client: {:?}", second.request_log());

    first.disconnect().await?;
    Ok(())
}
