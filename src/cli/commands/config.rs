//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, config_path: Option<&str>, settings: Settings) -> Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", path.display());
        }

        ConfigAction::Init { force } => {
            if path.exists() && !force {
                Output::warning(&format!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                ));
                return Ok(());
            }
            settings.save_to(&path)?;
            Output::success(&format!("Wrote config to {}", path.display()));
        }
    }

    Ok(())
}
