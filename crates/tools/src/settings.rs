//! Command-line value parsing and optional TOML generator configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use levelgen::{DesignLabel, GeneratorConfig, LevelSize};

/// Defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

pub fn parse_design(value: &str) -> Result<DesignLabel, String> {
    DesignLabel::ALL.into_iter().find(|label| label.as_str() == value).ok_or_else(|| {
        let known: Vec<&str> = DesignLabel::ALL.iter().map(|label| label.as_str()).collect();
        format!("unknown design '{value}', expected one of: {}", known.join(", "))
    })
}

pub fn parse_size(value: &str) -> Result<LevelSize, String> {
    match value {
        "small" => Ok(LevelSize::Small),
        "medium" => Ok(LevelSize::Medium),
        "large" => Ok(LevelSize::Large),
        other => Err(format!("unknown size '{other}', expected small, medium or large")),
    }
}
