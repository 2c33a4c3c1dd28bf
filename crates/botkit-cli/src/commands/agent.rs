//! `botkit assets|status|log`: direct calls against the bot agent.
//!
//! Unlike a running bot, these surface agent errors as-is.

use crate::cli::AssetAction;
use botkit_agent::{AgentClient, LogLevel};
use botkit_core::Config;

fn client(config: &Config) -> anyhow::Result<AgentClient> {
    let agent = &config.agent;
    if !agent.enabled {
        anyhow::bail!("The bot agent is disabled in the config ([agent] enabled = false)");
    }
    Ok(AgentClient::new(&agent.host, agent.port, agent.timeout())?)
}

pub async fn assets(config: &Config, action: AssetAction) -> anyhow::Result<()> {
    let client = client(config)?;
    match action {
        AssetAction::List => {
            let keys = client.list_asset_keys().await?;
            if keys.is_empty() {
                println!("No assets configured.");
            }
            for key in keys {
                println!("{key}");
            }
        }
        AssetAction::Get { key } => println!("{}", client.get_asset(&key).await?),
    }
    Ok(())
}

pub async fn status(config: &Config, message: &str, execution_id: Option<&str>) -> anyhow::Result<()> {
    let acknowledged = client(config)?.update_status(message, execution_id).await?;
    if !acknowledged {
        anyhow::bail!("The bot agent did not acknowledge the status update");
    }
    println!("Status updated");
    Ok(())
}

pub async fn log(config: &Config, message: &str, level: &str) -> anyhow::Result<()> {
    let level: LogLevel = level.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    if !client(config)?.log(message, level).await {
        anyhow::bail!("The bot agent did not accept the log entry");
    }
    Ok(())
}
