//! Loading simulation configuration from JSON files.

use anyhow::{Context, Result};
use autopoiesis_core::SimulationConfig;
use std::fs;
use std::path::Path;
use tracing::info;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

pub fn load_config(path: &Path) -> autopoiesis_core::Result<SimulationConfig> {
    let text = fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    Ok(config)
}

/// An explicit path must load. Without one, `config.json` is used if it
/// exists and built-in defaults otherwise.
pub fn resolve_config(explicit: Option<&Path>) -> Result<SimulationConfig> {
    if let Some(path) = explicit {
        return load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        info!(path = DEFAULT_CONFIG_PATH, "Loading configuration");
        return load_config(default_path)
            .with_context(|| format!("failed to load config from {DEFAULT_CONFIG_PATH}"));
    }

    info!("No configuration file found, using defaults");
    Ok(SimulationConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopoiesis_core::Error;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "autopoiesis-{}-{name}",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_config_file() {
        let path = temp_file(
            "config.json",
            r#"{ "seed": 3, "world": { "size": 4 }, "driver": { "steps": 2 } }"#,
        );
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.seed, 3);
        assert_eq!(config.world.size, 4);
        assert_eq!(config.driver.steps, 2);

        let world = autopoiesis_world::WorldFactory::new()
            .create_world(&config)
            .unwrap();
        assert_eq!(world.current_grid().len(), 16);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("autopoiesis-does-not-exist.json");
        assert!(matches!(load_config(&path), Err(Error::Io(_))));
        assert!(resolve_config(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let path = temp_file("broken.json", "{ \"world\": ");
        let result = load_config(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
