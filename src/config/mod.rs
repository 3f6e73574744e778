//! Configuration loading for pmreport

mod schema;

pub use schema::{is_valid_locale, CliOverrides, Config, EffectiveConfig, DEFAULT_LOCALE};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".pmreportrc.json";

/// Find and load config with extends resolution. Searches `work_dir` then
/// its parents unless `custom_path` is given. Returns the config and the file
/// it came from (`None` when no file was found).
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Some(path)
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            let config = load_config_with_extends(&path, &mut HashSet::new())?;
            validate(&config, &path)?;
            Ok((config, Some(path)))
        }
        None => Ok((Config::default(), None)),
    }
}

/// Load a config file and resolve its extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    if let Some(dir) = config.output_dir.take() {
        config.output_dir = Some(if dir.is_absolute() {
            dir
        } else {
            config_dir.join(dir)
        });
    }

    if let Some(extends) = config.extends.take() {
        let base_path = config_dir.join(&extends);
        let base_path = if base_path.extension().is_none() {
            base_path.with_extension("json")
        } else {
            base_path
        };
        if !base_path.exists() {
            anyhow::bail!(
                "Extended config not found: {} (referenced from {})",
                base_path.display(),
                config_path.display()
            );
        }
        let base = load_config_with_extends(&base_path, visited)?;
        config.merge_from(base);
    }

    Ok(config)
}

fn validate(config: &Config, path: &Path) -> Result<()> {
    if let Some(locale) = &config.locale {
        if !is_valid_locale(locale) {
            anyhow::bail!("Invalid locale {:?} in config: {}", locale, path.display());
        }
    }
    Ok(())
}

/// Search for .pmreportrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
