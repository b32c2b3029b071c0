use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::vehicle::Drivetrain;
use crate::ConfigError;

/// One dealership to scrape in a multi-dealer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealerConfig {
    /// Display label; defaults to the URL when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub platform: Platform,
    /// Inventory page the listings were scraped from.
    pub url: String,
    /// Raw-record dump read by the offline adapter. Relative paths resolve
    /// against the directory containing the dealers file.
    pub source: PathBuf,
    /// Extra dealer-installed accessory names on top of the platform list.
    #[serde(default)]
    pub accessory_names: Vec<String>,
}

impl DealerConfig {
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.url)
    }
}

/// Run-wide settings block of the dealers file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Drivetrain folding table, e.g. `{"4WD": "AWD"}`. Absent means the
    /// pipeline default; an empty map disables folding.
    #[serde(default)]
    pub drivetrain_aliases: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct DealersFile {
    #[serde(default)]
    pub settings: RunSettings,
    #[serde(default)]
    pub dealers: Vec<DealerConfig>,
}

impl DealersFile {
    /// Typed drivetrain alias table, or `None` when the file does not set one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a key or value is not a drivetrain token.
    pub fn drivetrain_aliases(
        &self,
    ) -> Result<Option<BTreeMap<Drivetrain, Drivetrain>>, ConfigError> {
        self.settings
            .drivetrain_aliases
            .as_ref()
            .map(parse_drivetrain_aliases)
            .transpose()
    }
}

/// Load and validate the dealers configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_dealers(path: &Path) -> Result<DealersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DealersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut dealers_file = parse_dealers(&content)?;

    if let Some(base) = path.parent() {
        for dealer in &mut dealers_file.dealers {
            if dealer.source.is_relative() {
                dealer.source = base.join(&dealer.source);
            }
        }
    }

    Ok(dealers_file)
}

/// Parse and validate dealers YAML already in memory. Source paths are left
/// as written.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_dealers(content: &str) -> Result<DealersFile, ConfigError> {
    let dealers_file: DealersFile =
        serde_yaml::from_str(content).map_err(ConfigError::DealersFileParse)?;
    validate_dealers(&dealers_file)?;
    Ok(dealers_file)
}

fn validate_dealers(dealers_file: &DealersFile) -> Result<(), ConfigError> {
    if dealers_file.dealers.is_empty() {
        return Err(ConfigError::Validation(
            "dealers file must contain at least one dealer entry".to_string(),
        ));
    }

    let mut seen_labels = HashSet::new();

    for (idx, dealer) in dealers_file.dealers.iter().enumerate() {
        if dealer.url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "dealers[{idx}] is missing a url"
            )));
        }

        if dealer.source.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "dealer '{}' is missing a source",
                dealer.label()
            )));
        }

        if !seen_labels.insert(dealer.label().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate dealer: '{}'",
                dealer.label()
            )));
        }
    }

    dealers_file.drivetrain_aliases()?;

    Ok(())
}

fn parse_drivetrain_aliases(
    raw: &BTreeMap<String, String>,
) -> Result<BTreeMap<Drivetrain, Drivetrain>, ConfigError> {
    let token = |s: &str| {
        Drivetrain::from_token(s).ok_or_else(|| {
            ConfigError::Validation(format!(
                "'{s}' is not a drivetrain token in drivetrain_aliases"
            ))
        })
    };

    raw.iter()
        .map(|(from, to)| Ok((token(from)?, token(to)?)))
        .collect()
}

#[cfg(test)]
#[path = "dealers_test.rs"]
mod tests;
