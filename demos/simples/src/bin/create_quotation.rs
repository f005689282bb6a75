use b1_client::prelude::*;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    let card_code = std::env::args().nth(1).unwrap_or_else(|| "C000082".to_string());
    info!("Creating a quotation for {}", card_code);

    let mut client = SessionClient::connect(ClientConfig::new()).await?;

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let quotation = json!({
        "CardCode": card_code,
        "DocDate": today,
        "DocDueDate": today,
        "Comments": "Created from b1-client",
        "DocumentLines": [
            { "ItemCode": "PREVENTIVO CRM", "Quantity": "1", "UnitPrice": 0 }
        ]
    });

    match client.post("Quotations", quotation).await {
        Ok(_) => info!(
            "✓ Quotation created with DocEntry {}",
            client.response("DocEntry").cloned().unwrap_or_default()
        ),
        Err(e) => error!("Quotation rejected: {}", e),
    }

    let entry = client.response("DocEntry").and_then(|v| v.as_i64());
    if let Some(entry) = entry {
        client
            .patch(&format!("Quotations({entry})"), json!({ "Comments": "Updated from b1-client" }))
            .await?;
        info!("✓ Quotation {} updated", entry);
    }

    client.disconnect().await?;
    info!("Session closed, {} calls made", client.request_log().len());

    Ok(())
}
