use std::fs;
use std::path::Path;
use anyhow::Context;
use serde::Serialize;
use easel_core::config::{NavigationConfig, PreloadConfig, SystemConfig};

#[derive(Serialize, Default)]
struct FullConfig {
    system: SystemConfig,
    preload: PreloadConfig,
    navigation: NavigationConfig,
}

pub fn ensure_config_exists(path: &str) -> anyhow::Result<()> {
    if Path::new(path).exists() {
        return Ok(());
    }

    println!("Creating default configuration at '{}'...", path);

    let toml_str = toml::to_string_pretty(&FullConfig::default())
        .context("Failed to serialize default config")?;

    fs::write(path, toml_str)
        .with_context(|| format!("Failed to write config file '{}'", path))?;
    println!("Config file created successfully.");
    Ok(())
}
