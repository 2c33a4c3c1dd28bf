//! Automations bundled with the CLI.

use async_trait::async_trait;
use botkit_core::{Automation, Bot, Outcome};
use std::fs;
use std::path::Path;

const PROBED_ASSETS: [&str; 3] = ["api_key", "database_url", "username"];

/// Reports the files waiting in the `input` folder.
pub struct InputFilesBot;

#[async_trait]
impl Automation for InputFilesBot {
    async fn execute(&mut self, bot: &Bot) -> anyhow::Result<Outcome> {
        tracing::info!("Starting {}...", bot.name());

        let input = bot.folders().ensure("input")?;
        bot.folders().ensure("output")?;
        bot.update_status("Processing automation tasks...").await;

        let files = list_files(&input)?;
        if files.is_empty() {
            tracing::info!("No files found in input folder");
            tracing::info!("Add files to: {}", input.display());
        } else {
            tracing::info!("Found {} files to process", files.len());
            for file in &files {
                tracing::info!("Processing: {file}");
            }
        }

        bot.update_status("Automation completed").await;

        Ok(Outcome::new()
            .with_message(format!("Processed {} input files", files.len()))
            .with_data("items_processed", files.len())
            .with_data("files", files))
    }
}

/// Summarizes the assets the agent exposes into `output/asset_summary.txt`.
///
/// Asset values are never logged or written, only whether they were found.
pub struct AssetDemoBot;

#[async_trait]
impl Automation for AssetDemoBot {
    async fn execute(&mut self, bot: &Bot) -> anyhow::Result<Outcome> {
        tracing::info!("Starting asset demo...");

        let keys = bot.get_all_asset_keys().await;
        tracing::info!("Found {} assets: {keys:?}", keys.len());

        let mut found = Vec::new();
        for key in PROBED_ASSETS {
            if bot.get_asset(key).await.is_some() {
                tracing::info!("Found {key}");
                found.push(key.to_string());
            }
        }

        let output_file = bot.folders().ensure("output")?.join("asset_summary.txt");
        fs::write(&output_file, summary(&keys, &found))?;
        tracing::info!("Summary saved to: {}", output_file.display());

        Ok(Outcome::new()
            .with_message(format!("Asset demo completed! Found {} assets", keys.len()))
            .with_data("total_assets", keys.len())
            .with_data("asset_keys", keys)
            .with_data("found_assets", found)
            .with_data("output_file", output_file.to_string_lossy().to_string()))
    }
}

/// Plain file names directly inside `dir`, sorted.
fn list_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    files.sort();
    Ok(files)
}

fn summary(keys: &[String], found: &[String]) -> String {
    let mut out = String::from("Asset Demo Results\n==================\n\n");
    out.push_str(&format!("Total assets available: {}\n", keys.len()));
    out.push_str(&format!("Assets we tried to get: {}\n", PROBED_ASSETS.join(", ")));
    if found.is_empty() {
        out.push_str("Assets found: None\n\n");
    } else {
        out.push_str(&format!("Assets found: {}\n\n", found.join(", ")));
    }
    out.push_str("All available asset keys:\n");
    for key in keys {
        out.push_str(&format!("  - {key}\n"));
    }
    if keys.is_empty() {
        out.push_str("  (No assets configured)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use botkit_core::{BotOptions, Config};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn standalone_bot(dir: &TempDir, name: &str) -> Bot {
        let mut config = Config::default();
        config.folders.base_path = dir.path().to_string_lossy().to_string();
        config.agent.enabled = false;
        config.logging.ansi = false;
        Bot::with_options(name, BotOptions::new().config(config)).unwrap()
    }

    #[tokio::test]
    async fn test_input_files_bot_lists_files() {
        let dir = TempDir::new().unwrap();
        let mut bot = standalone_bot(&dir, "InputFilesBot");
        let input = bot.folders().path("input");
        fs::write(input.join("b.csv"), "1").unwrap();
        fs::write(input.join("a.csv"), "2").unwrap();
        fs::create_dir(input.join("nested")).unwrap();

        let result = bot.run(&mut InputFilesBot).await;
        assert!(result.success, "{}", result.message);
        assert_eq!(result.message, "Processed 2 input files");
        assert_eq!(result.data["items_processed"], json!(2));
        assert_eq!(result.data["files"], json!(["a.csv", "b.csv"]));
    }

    #[tokio::test]
    async fn test_asset_demo_standalone() {
        let dir = TempDir::new().unwrap();
        let mut bot = standalone_bot(&dir, "AssetDemoBot");

        let result = bot.run(&mut AssetDemoBot).await;
        assert!(result.success, "{}", result.message);
        assert_eq!(result.data["total_assets"], json!(0));

        let summary = fs::read_to_string(bot.folders().path("output").join("asset_summary.txt")).unwrap();
        assert!(summary.contains("Assets found: None"));
        assert!(summary.contains("(No assets configured)"));
    }

    #[tokio::test]
    async fn test_asset_demo_with_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/assets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["api_key", "smtp_host"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/assets/api_key"))
            .respond_with(ResponseTemplate::new(200).set_body_string("never-logged"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/assets/database_url"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/assets/username"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.folders.base_path = dir.path().to_string_lossy().to_string();
        config.logging.ansi = false;
        config.agent.host = server.address().ip().to_string();
        config.agent.port = server.address().port();
        let mut bot = Bot::with_options("AssetDemoBot", BotOptions::new().config(config)).unwrap();

        let result = bot.run(&mut AssetDemoBot).await;
        assert!(result.success, "{}", result.message);
        assert_eq!(result.message, "Asset demo completed! Found 2 assets");
        assert_eq!(result.data["found_assets"], json!(["api_key"]));

        let summary = fs::read_to_string(bot.folders().path("output").join("asset_summary.txt")).unwrap();
        assert!(summary.contains("  - smtp_host"));
        assert!(!summary.contains("never-logged"));
    }

    #[test]
    fn test_summary_lists_found_assets() {
        let text = summary(&["api_key".to_string()], &["api_key".to_string()]);
        assert!(text.contains("Total assets available: 1"));
        assert!(text.contains("Assets found: api_key"));
        assert!(!text.contains("No assets configured"));
    }
}
