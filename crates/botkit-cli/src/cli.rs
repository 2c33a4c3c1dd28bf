//! CLI argument and command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "botkit", version, about = "Run automation bots and talk to the local bot agent")]
pub struct Cli {
    /// Config file (defaults to config/config.toml).
    #[arg(long, env = "BOTKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Bot name (defaults to [bot] name from the config).
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a bundled automation once and print its result.
    Run {
        /// Which automation to run.
        #[arg(long, value_enum, default_value_t = Demo::InputFiles)]
        demo: Demo,

        /// Print the execution record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage the bot's working folders.
    Folders {
        #[command(subcommand)]
        action: FolderAction,
    },

    /// Read assets from the bot agent.
    Assets {
        #[command(subcommand)]
        action: AssetAction,
    },

    /// Push a status string to the bot agent.
    Status {
        /// Status text.
        message: String,

        /// Scope the update to one execution.
        #[arg(long)]
        execution_id: Option<String>,
    },

    /// Forward a log line to the bot agent.
    Log {
        /// Log text.
        message: String,

        /// debug, info, warning or error.
        #[arg(long, default_value = "info")]
        level: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// List and report the files waiting in the input folder.
    InputFiles,
    /// Summarize the assets the agent exposes.
    Assets,
}

impl Demo {
    pub fn default_bot_name(self) -> &'static str {
        match self {
            Demo::InputFiles => "InputFilesBot",
            Demo::Assets => "AssetDemoBot",
        }
    }
}

#[derive(Subcommand)]
pub enum FolderAction {
    /// Create every configured folder.
    Create,
    /// Empty the output and temp folders.
    Clean,
    /// Print the base folder, or the folder of ROLE.
    Path {
        role: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AssetAction {
    /// List asset keys.
    List,
    /// Print one asset value.
    Get {
        key: String,
    },
}
