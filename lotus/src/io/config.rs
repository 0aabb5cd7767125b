//! Server configuration stored in `lotus.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::journey::JourneyOptions;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lotus.toml";

/// Server configuration (TOML).
///
/// Missing fields default to the values the server ships with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LotusConfig {
    /// Render each accepted step as a banner on stderr.
    pub echo_steps: bool,

    /// Characters of step content kept in summary briefs.
    pub brief_chars: usize,

    /// Attach framework guidance to the first progress step of a journey.
    pub first_step_guidance: bool,

    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Sessions idle longer than this are evicted.
    pub session_idle_timeout_secs: u64,
    /// How often the eviction sweep runs.
    pub sweep_interval_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            session_idle_timeout_secs: 60 * 60,
            sweep_interval_secs: 60,
        }
    }
}

impl Default for LotusConfig {
    fn default() -> Self {
        Self {
            echo_steps: false,
            brief_chars: 50,
            first_step_guidance: true,
            http: HttpConfig::default(),
        }
    }
}

impl LotusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.brief_chars == 0 {
            return Err(anyhow!("brief_chars must be > 0"));
        }
        if self.http.bind.trim().is_empty() {
            return Err(anyhow!("http.bind must be non-empty"));
        }
        if self.http.session_idle_timeout_secs == 0 {
            return Err(anyhow!("http.session_idle_timeout_secs must be > 0"));
        }
        if self.http.sweep_interval_secs == 0 {
            return Err(anyhow!("http.sweep_interval_secs must be > 0"));
        }
        Ok(())
    }

    /// Options handed to every new journey.
    pub fn journey_options(&self) -> JourneyOptions {
        JourneyOptions {
            brief_chars: self.brief_chars,
            first_step_guidance: self.first_step_guidance,
        }
    }

    /// Apply `LOTUS_DEBUG` and `PORT` overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("LOTUS_DEBUG").is_some_and(|value| value == "true") {
            self.echo_steps = true;
        }
        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .with_context(|| format!("parse PORT '{port}'"))?;
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LotusConfig::default()`.
pub fn load_config(path: &Path) -> Result<LotusConfig> {
    if !path.exists() {
        let cfg = LotusConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LotusConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load from `path`, then apply process environment overrides.
pub fn load_config_with_env(path: &Path) -> Result<LotusConfig> {
    let mut cfg = load_config(path)?;
    cfg.apply_env(|key| std::env::var(key).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LotusConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, LotusConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("lotus.toml");
        let cfg = LotusConfig {
            echo_steps: true,
            brief_chars: 80,
            ..LotusConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("lotus.toml");
        fs::write(&path, "brief_chars = 20\n[http]\nport = 8080\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.brief_chars, 20);
        assert_eq!(cfg.http.port, 8080);
        assert_eq!(cfg.http.bind, "127.0.0.1");
        assert!(cfg.first_step_guidance);
    }

    #[test]
    fn zero_brief_chars_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("lotus.toml");
        fs::write(&path, "brief_chars = 0\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(err.to_string().contains("brief_chars"));
    }

    #[test]
    fn env_overrides_debug_and_port() {
        let mut cfg = LotusConfig::default();
        cfg.apply_env(|key| match key {
            "LOTUS_DEBUG" => Some("true".to_string()),
            "PORT" => Some("4100".to_string()),
            _ => None,
        })
        .expect("apply");
        assert!(cfg.echo_steps);
        assert_eq!(cfg.http.port, 4100);

        let err = cfg
            .apply_env(|key| (key == "PORT").then(|| "not-a-port".to_string()))
            .expect_err("bad port");
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn journey_options_follow_config() {
        let cfg = LotusConfig {
            brief_chars: 12,
            first_step_guidance: false,
            ..LotusConfig::default()
        };
        let options = cfg.journey_options();
        assert_eq!(options.brief_chars, 12);
        assert!(!options.first_step_guidance);
    }
}
