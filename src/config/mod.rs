mod types;

pub use types::*;

use anyhow::{Context, Result};
use mediashelf_common::Error;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Failed to load config file: {:?}", path))
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content).context("Failed to parse config")?;

    expand_library_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./mediashelf.toml",
        "~/.config/mediashelf/config.toml",
        "/etc/mediashelf/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

fn expand_library_paths(config: &mut Config) {
    for library in config.libraries.iter_mut() {
        let raw = library.path.to_string_lossy().into_owned();
        library.path = PathBuf::from(shellexpand::tilde(&raw).as_ref());
    }
    let raw = config.catalog.icon_cache_dir.to_string_lossy().into_owned();
    config.catalog.icon_cache_dir = PathBuf::from(shellexpand::tilde(&raw).as_ref());
}

/// Validate configuration
fn validate_config(config: &Config) -> mediashelf_common::Result<()> {
    let invalid = |msg: String| -> mediashelf_common::Result<()> { Err(Error::Config(msg)) };

    if config.server.port == 0 {
        return invalid("Server port cannot be 0".to_string());
    }

    for (index, library) in config.libraries.iter().enumerate() {
        if library.name.trim().is_empty() {
            return invalid(format!("Library #{} has no name", index));
        }
        if library.path.as_os_str().is_empty() {
            return invalid(format!("Library '{}' has no path", library.name));
        }
        if !library.path.exists() {
            tracing::warn!("Library path does not exist: {:?}", library.path);
        }
    }

    if config.catalog.scan_concurrency == 0 {
        return invalid("catalog.scan_concurrency must be at least 1".to_string());
    }

    let route = config.icons.cache_route.trim_end_matches('/');
    if !route.starts_with('/') || route.is_empty() {
        return invalid(format!(
            "icons.cache_route must be an absolute sub-path like \"/icons\", got {:?}",
            config.icons.cache_route
        ));
    }

    Ok(())
}
