//! botkit: run automation bots against the local bot agent.

mod cli;
mod commands;
mod demos;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = botkit_core::Config::load_with_source(cli.config.as_deref());

    // Bots log through their own destinations; this only covers the other commands.
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("botkit=debug,botkit_core=debug,botkit_agent=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Run { demo, json } => {
            let name = commands::bot_name(cli.name.as_deref(), &config)
                .unwrap_or_else(|| demo.default_bot_name().to_string());
            commands::run::run(&name, demo, config, source, json).await
        }
        Commands::Folders { action } => {
            let name = commands::require_bot_name(cli.name.as_deref(), &config)?;
            commands::folders::run(&name, &config, action)
        }
        Commands::Assets { action } => commands::agent::assets(&config, action).await,
        Commands::Status {
            ref message,
            ref execution_id,
        } => commands::agent::status(&config, message, execution_id.as_deref()).await,
        Commands::Log {
            ref message,
            ref level,
        } => commands::agent::log(&config, message, level).await,
    };

    if let Err(err) = result {
        if let Some(exit_err) = err.downcast_ref::<commands::ExitError>() {
            std::process::exit(exit_err.code);
        }
        return Err(err);
    }

    Ok(())
}
