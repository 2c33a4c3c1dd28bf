//! `botkit run`: execute a bundled automation once.

use super::ExitError;
use crate::cli::Demo;
use crate::demos::{AssetDemoBot, InputFilesBot};
use botkit_core::{Automation, Bot, BotOptions, Config, ConfigSource, ExecutionResult};

pub async fn run(
    name: &str,
    demo: Demo,
    config: Config,
    source: ConfigSource,
    json: bool,
) -> anyhow::Result<()> {
    let mut bot = Bot::with_options(name, BotOptions::new().loaded_config(config, source))?;

    let mut automation: Box<dyn Automation> = match demo {
        Demo::InputFiles => Box::new(InputFilesBot),
        Demo::Assets => Box::new(AssetDemoBot),
    };
    let result = bot.run(automation.as_mut()).await;

    print_result(&result, json)?;
    if !result.success {
        return Err(ExitError { code: 1 }.into());
    }
    Ok(())
}

fn print_result(result: &ExecutionResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.success {
        println!("SUCCESS: {}", result.message);
        println!("Completed in {:.2} seconds", result.execution_time);
    } else {
        println!("FAILED: {}", result.message);
    }
    Ok(())
}
