//! Configuration commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use osmos_common::{ProjectConfig, CONFIG_FILE_NAME};
use std::path::PathBuf;

use crate::output::{print_success, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,

    /// Write a default configuration file into the project root
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn execute(
    cmd: ConfigCommands,
    config: &ProjectConfig,
    config_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Table | OutputFormat::Plain => {
                print!("{}", toml::to_string_pretty(config)?);
            }
        },
        ConfigCommands::Init { force } => {
            let path = config_path.unwrap_or_else(|| config.project_root.join(CONFIG_FILE_NAME));
            if path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", path.display());
            }

            let fresh = ProjectConfig::for_root(&config.project_root);
            fresh
                .save(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            print_success(&format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_file() {
        let tmp = TempDir::new().unwrap();
        let config = ProjectConfig::for_root(tmp.path());

        execute(ConfigCommands::Init { force: false }, &config, None, OutputFormat::Plain).unwrap();

        let loaded = ProjectConfig::load(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(loaded.project_root, tmp.path());
        assert_eq!(loaded.results.max_files, 10);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[results]\nmax_files = 2\n").unwrap();
        let config = ProjectConfig::for_root(tmp.path());

        assert!(execute(ConfigCommands::Init { force: false }, &config, None, OutputFormat::Plain).is_err());
        execute(ConfigCommands::Init { force: true }, &config, None, OutputFormat::Plain).unwrap();
        assert_eq!(ProjectConfig::load(&path).unwrap().results.max_files, 10);
    }
}
