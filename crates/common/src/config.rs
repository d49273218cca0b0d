//! Project configuration
//!
//! Describes where the wrapped Playwright project keeps its artefacts and
//! which npm scripts the tools invoke. Every field has a default, so a missing
//! or partial `osmos.toml` is valid.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Default configuration file name, looked up in the project root
pub const CONFIG_FILE_NAME: &str = "osmos.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Root of the Playwright project; all other paths are relative to it
    pub project_root: PathBuf,

    /// Artefact locations
    pub paths: PathsConfig,

    /// Commands invoked by the run/report tools
    pub commands: CommandsConfig,

    /// File-name filters for listings
    pub listing: ListingConfig,

    /// Result file summarization
    pub results: ResultsConfig,

    /// Log tailing
    pub logs: LogsConfig,

    /// Audit log of tool calls
    pub audit: AuditConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            paths: PathsConfig::default(),
            commands: CommandsConfig::default(),
            listing: ListingConfig::default(),
            results: ResultsConfig::default(),
            logs: LogsConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

/// Artefact locations, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub allure_results: PathBuf,
    pub playwright_results: PathBuf,
    pub tests: PathBuf,
    pub pages: PathBuf,
    pub logs: PathBuf,
    pub config_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            allure_results: PathBuf::from("reports/allure-results"),
            playwright_results: PathBuf::from("test-results"),
            tests: PathBuf::from("tests"),
            pages: PathBuf::from("pages"),
            logs: PathBuf::from("logs"),
            config_file: PathBuf::from("playwright.config.js"),
        }
    }
}

/// npm/npx programs and the script names of the wrapped project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub npm: String,
    pub npx: String,
    pub test_script: String,
    pub headed_script: String,
    pub debug_script: String,
    pub smoke_script: String,
    pub regression_script: String,
    pub allure_report_script: String,
    pub allure_generate_script: String,

    /// Cap on captured bytes per output stream
    pub max_output_bytes: usize,

    /// Kill the command after this many seconds (None = wait indefinitely)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            npm: "npm".to_string(),
            npx: "npx".to_string(),
            test_script: "test".to_string(),
            headed_script: "test:headed".to_string(),
            debug_script: "test:debug".to_string(),
            smoke_script: "test:smoke".to_string(),
            regression_script: "test:regression".to_string(),
            allure_report_script: "allure:report".to_string(),
            allure_generate_script: "allure:generate".to_string(),
            max_output_bytes: 10 * 1024 * 1024,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub test_suffixes: Vec<String>,
    pub page_object_suffixes: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            test_suffixes: vec![".spec.js".to_string(), ".test.js".to_string()],
            page_object_suffixes: vec![".js".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Maximum number of result files read per call
    pub max_files: usize,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self { max_files: 10 }
    }
}

/// How the "most recent" log file is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSelection {
    /// Lexicographically last file name (`test-YYYY-MM-DD.log` sorts by date)
    #[default]
    Name,
    /// Latest modification time
    Modified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub default_limit: usize,
    pub selection: LogSelection,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            selection: LogSelection::Name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    /// Directory relative to the project root
    pub dir: PathBuf,
    pub prefix: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("logs/mcp"),
            prefix: "mcp".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Configuration rooted at `root` with every other field defaulted
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: root.into(),
            ..Default::default()
        }
    }

    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| Error::at_path(path, e))?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Locate and load the configuration for a server or CLI invocation.
    ///
    /// An explicit `root` wins over `project_root` in the file. Otherwise a
    /// relative `project_root` is taken relative to the directory holding the
    /// configuration file. Without `config_path` the file is looked up as
    /// `osmos.toml` in the project root.
    pub fn discover(root: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd, root, config_path)
    }

    fn discover_from(cwd: &Path, root: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let base = root.map(|r| cwd.join(r)).unwrap_or_else(|| cwd.to_path_buf());
        let file = match config_path {
            Some(path) => cwd.join(path),
            None => base.join(CONFIG_FILE_NAME),
        };

        let mut config = Self::load(&file)?;
        let project_root = match root {
            Some(_) => base,
            None => file.parent().unwrap_or(cwd).join(&config.project_root),
        };
        config.project_root = without_cur_dir(&project_root);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::at_path(parent, e))?;
        }
        std::fs::write(path, content).map_err(|e| Error::at_path(path, e))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.commands.max_output_bytes == 0 {
            return Err(Error::InvalidConfig(
                "commands.max_output_bytes must be greater than zero".into(),
            ));
        }
        if self.commands.npm.trim().is_empty() || self.commands.npx.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "commands.npm and commands.npx must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve a project-relative path
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.project_root.join(relative)
    }

    pub fn allure_results_dir(&self) -> PathBuf {
        self.resolve(&self.paths.allure_results)
    }

    pub fn playwright_results_dir(&self) -> PathBuf {
        self.resolve(&self.paths.playwright_results)
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.resolve(&self.paths.tests)
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.resolve(&self.paths.pages)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.resolve(&self.paths.logs)
    }

    pub fn config_file(&self) -> PathBuf {
        self.resolve(&self.paths.config_file)
    }

    pub fn audit_dir(&self) -> PathBuf {
        self.resolve(&self.audit.dir)
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
