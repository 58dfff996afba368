use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smsledger_core::{DEFAULT_MAX_COUNT, IngestConfig, MessageFilter};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_smsledger_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub source: SourceSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub mailbox: String,
    pub max_count: usize,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            mailbox: "inbox".to_string(),
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl SourceSection {
    pub fn filter(&self) -> MessageFilter {
        MessageFilter {
            mailbox: self.mailbox.clone(),
            max_count: self.max_count,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_smsledger_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.ingest.validate().context("invalid [ingest] section")?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let cfg = parse_config(
            r#"
[ingest]
usd_to_rwf = 1350.0

[ingest.senders]
bank = "EQUITY-RW"

[source]
max_count = 500
"#,
        )
        .unwrap();
        assert_eq!(cfg.ingest.usd_to_rwf, 1350.0);
        assert_eq!(cfg.ingest.senders.bank, "EQUITY-RW");
        assert_eq!(cfg.ingest.senders.mobile_money, "M-MONEY");
        assert_eq!(cfg.source.filter().max_count, 500);
        assert_eq!(cfg.source.mailbox, "inbox");
    }

    #[test]
    fn test_invalid_rate_rejected() {
        assert!(parse_config("[ingest]\nusd_to_rwf = 0.0\n").is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }
}
