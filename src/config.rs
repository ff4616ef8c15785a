use crate::error::{FuzzrankError, Result};
use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Engine configuration, fixed per engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Dotted field paths to inspect. Empty means auto-discover per record.
    pub search_fields: Vec<String>,
    /// Minimum normalized similarity for a fuzzy match, in `[0, 1]`.
    pub fuzzy_threshold: f64,
    pub max_results: usize,
    pub case_sensitive: bool,
    pub exact_match_boost: f64,
    pub partial_match_boost: f64,
    /// Quiet period before a debounced search runs.
    pub debounce_ms: u64,
}

fn default_fuzzy_threshold() -> f64 {
    0.6
}
fn default_max_results() -> usize {
    50
}
fn default_exact_match_boost() -> f64 {
    2.0
}
fn default_partial_match_boost() -> f64 {
    1.5
}
fn default_debounce_ms() -> u64 {
    300
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_fields: Vec::new(),
            fuzzy_threshold: default_fuzzy_threshold(),
            max_results: default_max_results(),
            case_sensitive: false,
            exact_match_boost: default_exact_match_boost(),
            partial_match_boost: default_partial_match_boost(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Per-call overrides. Unset fields fall back to the engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub search_fields: Option<Vec<String>>,
    pub fuzzy_threshold: Option<f64>,
    pub max_results: Option<usize>,
    pub case_sensitive: Option<bool>,
    pub exact_match_boost: Option<f64>,
    pub partial_match_boost: Option<f64>,
    pub debounce_ms: Option<u64>,
}

impl SearchOptions {
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = Some(threshold);
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = Some(debounce_ms);
        self
    }
}

/// Subset of the configuration that changes search output. Debounce timing
/// is excluded so the same query hits the cache regardless of delay.
#[derive(Serialize)]
struct Fingerprint<'a> {
    search_fields: &'a [String],
    fuzzy_threshold: f64,
    max_results: usize,
    case_sensitive: bool,
    exact_match_boost: f64,
    partial_match_boost: f64,
}

impl SearchConfig {
    /// Applies per-call overrides on top of this configuration.
    pub fn merged(&self, options: &SearchOptions) -> SearchConfig {
        SearchConfig {
            search_fields: options
                .search_fields
                .clone()
                .unwrap_or_else(|| self.search_fields.clone()),
            fuzzy_threshold: options
                .fuzzy_threshold
                .map(clamp_threshold)
                .unwrap_or(self.fuzzy_threshold),
            max_results: options.max_results.unwrap_or(self.max_results),
            case_sensitive: options.case_sensitive.unwrap_or(self.case_sensitive),
            exact_match_boost: options.exact_match_boost.unwrap_or(self.exact_match_boost),
            partial_match_boost: options
                .partial_match_boost
                .unwrap_or(self.partial_match_boost),
            debounce_ms: options.debounce_ms.unwrap_or(self.debounce_ms),
        }
    }

    /// Returns the configuration with the fuzzy threshold clamped into `[0, 1]`.
    pub fn sanitized(mut self) -> Self {
        self.fuzzy_threshold = clamp_threshold(self.fuzzy_threshold);
        self
    }

    /// Stable serialized form used as part of result cache keys.
    pub fn cache_fingerprint(&self) -> String {
        let fingerprint = Fingerprint {
            search_fields: &self.search_fields,
            fuzzy_threshold: self.fuzzy_threshold,
            max_results: self.max_results,
            case_sensitive: self.case_sensitive,
            exact_match_boost: self.exact_match_boost,
            partial_match_boost: self.partial_match_boost,
        };
        // Serializing plain fields cannot fail; non-finite floats become null.
        serde_json::to_string(&fingerprint).unwrap_or_default()
    }

    pub fn preset(preset: Preset) -> Self {
        let fields = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        match preset {
            Preset::Tender => SearchConfig {
                search_fields: fields(&[
                    "title",
                    "description",
                    "customer.name",
                    "category",
                    "lotPassport.itemName",
                    "number",
                ]),
                fuzzy_threshold: 0.6,
                max_results: 50,
                ..Default::default()
            },
            Preset::Contract => SearchConfig {
                search_fields: fields(&[
                    "number",
                    "title",
                    "supplier.name",
                    "customer.name",
                    "subject",
                    "status",
                ]),
                fuzzy_threshold: 0.7,
                max_results: 30,
                ..Default::default()
            },
            Preset::Competitor => SearchConfig {
                search_fields: fields(&["name", "inn", "region", "specialization", "website"]),
                fuzzy_threshold: 0.5,
                max_results: 20,
                ..Default::default()
            },
        }
    }
}

fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        default_fuzzy_threshold()
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

/// Named configurations for the record kinds the engine is usually fed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Tender,
    Contract,
    Competitor,
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Tender => write!(f, "tender"),
            Preset::Contract => write!(f, "contract"),
            Preset::Competitor => write!(f, "competitor"),
        }
    }
}

/// On-disk configuration file.
///
/// ```toml
/// preset = "tender"
///
/// [search]
/// max_results = 20
/// ```
///
/// When a preset is named, values in `[search]` override it.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub preset: Option<Preset>,
    pub search: Option<toml::Table>,
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FuzzrankError::Config(e.to_string()))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("fuzzrank/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".fuzzrank.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".fuzzrank.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }

    /// Resolves the effective engine configuration: preset (or defaults),
    /// then `[search]` overrides.
    pub fn search_config(&self) -> Result<SearchConfig> {
        let base = self
            .preset
            .map(SearchConfig::preset)
            .unwrap_or_default();

        let Some(overrides) = &self.search else {
            return Ok(base.sanitized());
        };

        let mut value =
            toml::Value::try_from(&base).map_err(|e| FuzzrankError::Config(e.to_string()))?;
        if let toml::Value::Table(table) = &mut value {
            for (key, override_value) in overrides {
                table.insert(key.clone(), override_value.clone());
            }
        }
        let merged: SearchConfig = value
            .try_into()
            .map_err(|e: toml::de::Error| FuzzrankError::Config(e.to_string()))?;
        Ok(merged.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
