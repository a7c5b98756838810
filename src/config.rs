use crate::money::Money;
use anyhow::{Context, Error, Result};
use async_std::fs;
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;

pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Forecast settings read from a yaml file. Command line flags take precedence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub opening_balance: Money,
    pub horizon_days: u32,
    pub from: Option<NaiveDate>,
    pub entries: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            opening_balance: Money::default(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            from: None,
            entries: None,
        }
    }
}

impl Settings {
    pub async fn from_file(file: &str) -> Result<Self> {
        let doc = fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read config {}", file))?;
        doc.parse()
    }
}

impl FromStr for Settings {
    type Err = Error;

    fn from_str(doc: &str) -> Result<Self, Self::Err> {
        if doc.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(doc).with_context(|| format!("Failed to deserialize Settings:\n{}", doc))
    }
}
