//! Parsing helpers for loosely formatted command-line and prompt input.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use neurohealth_triage::BiometricValue;

/// Split on commas, trimming items and dropping empty ones.
pub fn parse_csv(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty()).map(String::from).collect()
}

/// Parse an optional integer; blank input means "not provided".
pub fn parse_optional_int<T>(value: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).with_context(|| format!("expected an integer, got '{trimmed}'"))
}

/// Parse `key=value` entries into a biometrics map. Later keys overwrite earlier ones.
pub fn parse_biometrics<I, S>(items: I) -> Result<BTreeMap<String, BiometricValue>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| BiometricValue::parse_entry(item.as_ref()).map_err(anyhow::Error::from))
        .collect()
}
