//! Status command implementation

use anyhow::Result;
use bolso_core::{AssistantGateway, GatewayClient, LedgerStore};

pub async fn cmd_status(store: &LedgerStore) -> Result<()> {
    println!();
    println!("📊 Bolso Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Ledger
    println!("   Ledger: {}", store.path().display());
    if store.path().exists() {
        let expenses = store.load();
        println!("   Expenses: {}", expenses.len());
    } else {
        println!("   Expenses: (ledger not created yet)");
    }

    // Gateway
    println!();
    match GatewayClient::from_env() {
        Some(gateway) => {
            println!("   Gateway: {}", gateway.host());
            println!("   Model: {}", gateway.model());
            print!("   Checking gateway availability... ");
            if gateway.health_check().await {
                println!("✅ Connected");
            } else {
                println!("❌ Failed");
                println!();
                println!("   ⚠️  Could not reach the gateway at {}", gateway.host());
                println!("      Check GEMINI_API_KEY and your network connection.");
            }
        }
        None => {
            println!("   ❌ Gateway: not configured");
            println!("      Set GEMINI_API_KEY, or BOLSO_GATEWAY=mock for offline use.");
        }
    }

    println!();
    Ok(())
}
