use std::sync::Arc;

use discord_client::{DiscordClient, DiscordConfig};
use message_relay::{DiscordTransport, Relay, RelayConfig};
use tracing::{info, warn};
use watari::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_logging(false);

    let discord_config = DiscordConfig::from_env()?;
    info!("Connecting to Discord at {}", discord_config.api_url);
    let (client, me) = DiscordClient::connect(discord_config).await?;

    let relay_config = RelayConfig::from_env()?;
    let invoker = Arc::new(relay_config.command_invoker()?);
    info!(
        "Engine: {} (toolset: {})",
        invoker.program(),
        relay_config.functions
    );

    let transport = Arc::new(DiscordTransport::new(client, me));
    let messages = transport.messages();
    let relay = Arc::new(Relay::new(transport, invoker, relay_config));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    relay.run_with_shutdown(messages, shutdown).await?;
    info!("Relay stopped");

    Ok(())
}
