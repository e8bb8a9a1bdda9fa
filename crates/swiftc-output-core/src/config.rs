//! Configuration resolution for swiftc-output.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (`<config dir>/swiftc-output/settings.json`)
//! 3. Project config (`.swiftc-output/settings.json`)
//! 4. Environment variables
//! 5. CLI arguments (applied by the binary, highest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default upper bound on a single message body (64 MiB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// Default upper bound on a size line or free-form text line (1 MiB).
pub const DEFAULT_MAX_LINE_SIZE: usize = 1024 * 1024;

const CONFIG_DIR_NAME: &str = "swiftc-output";
const PROJECT_DIR_NAME: &str = ".swiftc-output";
const SETTINGS_FILE: &str = "settings.json";

/// Complete swiftc-output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Streaming parser limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Largest message body a size line may declare.
    pub max_frame_size: usize,
    /// Longest line buffered while waiting for its newline.
    pub max_line_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            max_line_size: DEFAULT_MAX_LINE_SIZE,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "swiftc_output=info,swiftc_output_core=info".to_string(),
            json: false,
        }
    }
}

/// One settings file; absent sections leave the lower layer untouched.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    parser: Option<ParserConfig>,
    logging: Option<LoggingConfig>,
}

/// Load configuration with hierarchical resolution.
pub fn load_config(project_dir: Option<&Path>) -> Result<Config> {
    load_config_from(
        global_config_path().as_deref(),
        project_dir,
        |key| std::env::var(key).ok(),
    )
}

/// Resolve configuration from an explicit global settings path and
/// environment lookup.
pub fn load_config_from(
    global_path: Option<&Path>,
    project_dir: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path.filter(|p| p.exists()) {
        merge_config(&mut config, load_config_file(global_path)?);
    }

    if let Some(dir) = project_dir {
        let project_path = project_config_path(dir);
        if project_path.exists() {
            merge_config(&mut config, load_config_file(&project_path)?);
        }
    }

    apply_env_overrides(&mut config, var);

    Ok(config)
}

/// Get the global settings file path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(SETTINGS_FILE))
}

/// Get the settings file path for a project directory.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_DIR_NAME).join(SETTINGS_FILE)
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn merge_config(base: &mut Config, overlay: ConfigFile) {
    if let Some(parser) = overlay.parser {
        base.parser = parser;
    }
    if let Some(logging) = overlay.logging {
        base.logging = logging;
    }
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("SWIFTC_OUTPUT_MAX_FRAME_SIZE") {
        if let Ok(n) = val.parse() {
            config.parser.max_frame_size = n;
        }
    }
    if let Some(val) = var("SWIFTC_OUTPUT_MAX_LINE_SIZE") {
        if let Ok(n) = val.parse() {
            config.parser.max_line_size = n;
        }
    }
    if let Some(val) = var("SWIFTC_OUTPUT_LOG_FILTER") {
        config.logging.filter = val;
    }
    if let Some(val) = var("SWIFTC_OUTPUT_LOG_JSON") {
        config.logging.json = matches!(val.as_str(), "1" | "true" | "yes");
    }
}
