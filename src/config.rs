//! Configuration management for typefold CLI
//!
//! Stores split defaults in ~/.typefold/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use typefold_core::{AssignStrategy, ImpurityPolicy, SplitConfig};

/// Keys accepted by `typefold config set/get`
pub const KEYS: &[&str] = &["n-splits", "strategy", "policy", "seed", "group-column", "type-column"];

/// CLI Configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default number of folds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_splits: Option<usize>,

    /// Default assignment strategy (balanced, round-robin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Default impurity policy (counts, majority)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// Default seed for tie shuffling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Default CSV column holding group ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_column: Option<String>,

    /// Default CSV column holding group types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_column: Option<String>,
}

impl Config {
    /// Get the config directory path (~/.typefold/)
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".typefold"))
    }

    /// Get the config file path (~/.typefold/config.toml)
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load config from file (default if not exists)
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::dir()?;
        let path = Self::path()?;

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Set a value by CLI key, validating it
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "n-splits" => {
                let n: usize = value.parse().context("n-splits must be a whole number")?;
                SplitConfig::default().with_n_splits(n).validate()?;
                self.n_splits = Some(n);
            }
            "strategy" => {
                value.parse::<AssignStrategy>().map_err(|e| anyhow::anyhow!(e))?;
                self.strategy = Some(value.to_string());
            }
            "policy" => {
                value.parse::<ImpurityPolicy>().map_err(|e| anyhow::anyhow!(e))?;
                self.policy = Some(value.to_string());
            }
            "seed" => self.seed = Some(value.parse().context("seed must be a whole number")?),
            "group-column" => self.group_column = Some(value.to_string()),
            "type-column" => self.type_column = Some(value.to_string()),
            _ => anyhow::bail!("Unknown config key: {}. Valid keys: {}", key, KEYS.join(", ")),
        }
        Ok(())
    }

    /// Get a value by CLI key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "n-splits" => self.n_splits.map(|n| n.to_string()),
            "strategy" => self.strategy.clone(),
            "policy" => self.policy.clone(),
            "seed" => self.seed.map(|s| s.to_string()),
            "group-column" => self.group_column.clone(),
            "type-column" => self.type_column.clone(),
            _ => anyhow::bail!("Unknown config key: {}", key),
        };
        Ok(value)
    }

    /// Split settings with config defaults applied
    pub fn split_config(&self) -> Result<SplitConfig> {
        let mut config = SplitConfig::default();
        if let Some(n) = self.n_splits {
            config = config.with_n_splits(n);
        }
        if let Some(strategy) = &self.strategy {
            config = config.with_strategy(strategy.parse().map_err(|e: String| anyhow::anyhow!(e))?);
        }
        if let Some(policy) = &self.policy {
            config = config.with_policy(policy.parse().map_err(|e: String| anyhow::anyhow!(e))?);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}
