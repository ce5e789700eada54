use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://news.ycombinator.com/";
pub const DEFAULT_ENDPOINT: &str = "news";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
// 5 MB cap
const DEFAULT_MAX_PAGE_BYTES: usize = 5 * 1024 * 1024;

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub base_url: Option<String>,
    pub open_command: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_page_bytes: Option<usize>,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Always ends with `/` so endpoints resolve beneath it.
    pub base_url: String,
    pub open_command: Option<String>,
    pub timeout: Duration,
    pub max_page_bytes: usize,
    /// Treat a listing with zero parsed entries as an error.
    pub strict: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            base_url: DEFAULT_BASE_URL.into(),
            open_command: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            strict: false,
        }
    }
}

impl TryFrom<AppConfig> for RuntimeConfig {
    type Error = anyhow::Error;

    fn try_from(parsed: AppConfig) -> Result<Self> {
        let defaults = RuntimeConfig::default();
        let base_url = match parsed.base_url {
            Some(raw) => normalize_base_url(&raw)?,
            None => defaults.base_url,
        };
        Ok(RuntimeConfig {
            base_url,
            open_command: parsed.open_command.filter(|c| !c.trim().is_empty()),
            timeout: parsed
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_page_bytes: parsed.max_page_bytes.unwrap_or(defaults.max_page_bytes),
            strict: parsed.strict.unwrap_or(defaults.strict),
        })
    }
}

/// Loads the config file from the default location, or falls back to
/// built-in defaults when there is none.
pub fn load() -> Result<RuntimeConfig> {
    match default_config_path() {
        Some(path) if path.is_file() => load_from(&path),
        _ => Ok(RuntimeConfig::default()),
    }
}

pub fn load_from(path: &Path) -> Result<RuntimeConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

pub fn parse(txt: &str) -> Result<RuntimeConfig> {
    let parsed: AppConfig = toml::from_str(txt)?;
    RuntimeConfig::try_from(parsed)
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid base_url: {}", raw))?;
    let mut s = String::from(url);
    if !s.ends_with('/') {
        s.push('/');
    }
    Ok(s)
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("hn-cli");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("hn-cli");
        p.push("config.toml");
        return Some(p);
    }
    None
}
