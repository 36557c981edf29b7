//! Configuration loading from files and environment variables.

use std::path::Path;

use config::{Config, Environment, File};

use crate::error::{HarvestError, HarvestResult};

use super::Settings;

/// Config file looked up in the working directory when none is given
const DEFAULT_CONFIG_NAME: &str = "figharvest";

/// Prefix for environment overrides, e.g. `FIGHARVEST__RENDER__DPI=200`
const ENV_PREFIX: &str = "FIGHARVEST";

/// Load settings from defaults, an optional config file, and env vars.
///
/// An explicitly named file must exist; the default `figharvest.{toml,yaml,json}`
/// is optional.
pub fn load_settings(config_path: Option<&Path>) -> HarvestResult<Settings> {
    load_settings_with_env(config_path, environment())
}

/// `FIGHARVEST__SECTION__KEY` overrides, values parsed to numbers where possible.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_settings_with_env(
    config_path: Option<&Path>,
    environment: Environment,
) -> HarvestResult<Settings> {
    let file_source = match config_path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let settings: Settings = Config::builder()
        .add_source(file_source)
        .add_source(environment)
        .build()
        .map_err(|e| HarvestError::Config {
            message: format!("Failed to build config: {}", e),
        })?
        .try_deserialize()
        .map_err(|e| HarvestError::Config {
            message: format!("Failed to deserialize settings: {}", e),
        })?;

    settings.validate()?;
    Ok(settings)
}
