//! Configuration Vault – reads/writes `~/.sightline/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::TimeDelta;
use sightline_language::{LanguageTables, SeededPicker, VariantPicker};
use sightline_runtime::NarratorConfig;
use sightline_types::Language;

/// How narrated sentences are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One plain sentence per line.
    #[default]
    Text,
    /// One JSON `Narration` record per line.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Persisted user configuration stored in `~/.sightline/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds a label is remembered after its last sighting.
    #[serde(default = "default_memory_length_secs")]
    pub memory_length_secs: u32,

    /// Narration language code (e.g. "en", "cs").
    #[serde(default = "default_language")]
    pub language: String,

    /// Seed for template selection.  Unset means a fresh seed per run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Optional TOML file layered over the bundled language tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables_path: Option<PathBuf>,

    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_memory_length_secs() -> u32 {
    10
}
fn default_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_length_secs: default_memory_length_secs(),
            language: default_language(),
            seed: None,
            tables_path: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    pub fn narrator_config(&self) -> NarratorConfig {
        NarratorConfig {
            memory_length: TimeDelta::seconds(i64::from(self.memory_length_secs)),
            language: Language::new(&self.language),
        }
    }

    /// Bundled tables, with `tables_path` layered on top when set.
    pub fn load_tables(&self) -> Result<Arc<LanguageTables>, String> {
        let tables = LanguageTables::bundled()
            .map_err(|e| format!("Bundled language tables are invalid: {}", e))?;
        let tables = match &self.tables_path {
            Some(path) => tables
                .with_overrides_from_path(path)
                .map_err(|e| format!("Failed to load language tables: {}", e))?,
            None => tables,
        };
        Ok(Arc::new(tables))
    }

    pub fn picker(&self) -> Box<dyn VariantPicker> {
        match self.seed {
            Some(seed) => Box::new(SeededPicker::seeded(seed)),
            None => Box::new(SeededPicker::from_entropy()),
        }
    }
}

/// Return the path to `~/.sightline/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".sightline").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `SIGHTLINE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `SIGHTLINE_LANGUAGE` | `language` |
/// | `SIGHTLINE_MEMORY_LENGTH` | `memory_length_secs` |
/// | `SIGHTLINE_SEED` | `seed` |
/// | `SIGHTLINE_TABLES` | `tables_path` |
/// | `SIGHTLINE_OUTPUT` | `output_format` (`text` / `json`) |
///
/// Unparsable numeric values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("SIGHTLINE_LANGUAGE") {
        cfg.language = v;
    }
    if let Ok(v) = std::env::var("SIGHTLINE_MEMORY_LENGTH")
        && let Ok(secs) = v.trim().parse::<u32>() {
            cfg.memory_length_secs = secs;
        }
    if let Ok(v) = std::env::var("SIGHTLINE_SEED")
        && let Ok(seed) = v.trim().parse::<u64>() {
            cfg.seed = Some(seed);
        }
    if let Ok(v) = std::env::var("SIGHTLINE_TABLES") {
        cfg.tables_path = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("SIGHTLINE_OUTPUT") {
        match v.trim().to_lowercase().as_str() {
            "json" => cfg.output_format = OutputFormat::Json,
            "text" => cfg.output_format = OutputFormat::Text,
            _ => {}
        }
    }
}

/// Save the config to disk, creating `~/.sightline/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
