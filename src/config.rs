use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::rule::ScanRule;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rule: ScanRule,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("logsift")
            .join("config.toml")
    }

    /// Update one `[rule]` key from the CLI. Unknown keys are rejected so a
    /// typo does not silently persist into the config file.
    pub fn set_rule_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "program_field" => self.rule.program_field = value.to_string(),
            "program_prefix" => self.rule.program_prefix = value.to_string(),
            "mfg_field" => self.rule.mfg_field = value.to_string(),
            "invalid_marker" => self.rule.invalid_marker = value.to_string(),
            "serial_field" => self.rule.serial_field = value.to_string(),
            "include_valid" => self.rule.include_valid = value.parse()?,
            _ => anyhow::bail!(
                "unknown key: {key} (available: program_field, program_prefix, \
                 mfg_field, invalid_marker, serial_field, include_valid)"
            ),
        }
        Ok(())
    }
}
