//! `botkit folders`: inspect and maintain working folders.

use crate::cli::FolderAction;
use botkit_core::{Config, FolderManager};

pub fn run(name: &str, config: &Config, action: FolderAction) -> anyhow::Result<()> {
    let folders = FolderManager::new(name, config)?;

    match action {
        FolderAction::Create => {
            for path in folders.create_all()? {
                println!("{}", path.display());
            }
        }
        FolderAction::Clean => {
            let removed = folders.clean();
            println!("Removed {removed} entries from output and temp");
        }
        FolderAction::Path { role: None } => println!("{}", folders.base().display()),
        FolderAction::Path { role: Some(role) } => println!("{}", folders.resolve(&role)?.display()),
    }

    Ok(())
}
