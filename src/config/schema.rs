//! Config schema and deserialization

use crate::stats::DEFAULT_SLOW_THRESHOLD_MS;
use serde::Deserialize;
use std::path::PathBuf;

/// Collation and document language used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "zh-Hant";

/// Root config structure for .pmreportrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Directory reports are written to. Relative paths are resolved against
    /// the directory of the config file that declares them.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Initial slow threshold (ms) shown in the viewer. Default: 500
    #[serde(default)]
    pub slow_threshold: Option<u32>,

    /// BCP 47 tag for `<html lang>` and name sorting. Default: zh-Hant
    #[serde(default)]
    pub locale: Option<String>,
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub slow_threshold: Option<u32>,
    pub locale: Option<String>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(self, cli: CliOverrides) -> EffectiveConfig {
        EffectiveConfig {
            output_dir: cli.output_dir.or(self.output_dir),
            slow_threshold: cli
                .slow_threshold
                .or(self.slow_threshold)
                .unwrap_or(DEFAULT_SLOW_THRESHOLD_MS),
            locale: cli
                .locale
                .or(self.locale)
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        }
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.output_dir.is_none() {
            self.output_dir = base.output_dir;
        }
        if self.slow_threshold.is_none() {
            self.slow_threshold = base.slow_threshold;
        }
        if self.locale.is_none() {
            self.locale = base.locale;
        }
    }
}

/// Fully resolved settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// `None` means the default next to the executable
    pub output_dir: Option<PathBuf>,
    pub slow_threshold: u32,
    pub locale: String,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Config::default().merge_with_cli(CliOverrides::default())
    }
}

/// Locale tags end up in an HTML attribute and a script literal, so only
/// letters, digits and `-` are accepted.
pub fn is_valid_locale(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
