use std::path::Path;

use anyhow::{Context, Result};
use catalyst_engine::config::EngineConfig;

pub fn save_config(config: &EngineConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide : {:?}", path))?;
    Ok(config)
}

/// Fichier éventuel, puis surcharge `--top` de la ligne de commande.
pub fn resolve_config(path: Option<&Path>, top: Option<usize>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(p) => load_config(p)?,
        None => EngineConfig::default(),
    };
    if let Some(n) = top {
        config = config.with_top_n(n);
    }
    log::debug!("Configuration moteur : {:?}", config);
    Ok(config)
}
