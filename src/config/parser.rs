use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitemap_grabber::config::load_config;
///
/// let config = load_config(Path::new("grabber.toml")).unwrap();
/// println!("Blacklist: {:?}", config.crawler.blacklist);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration at `path` if one was given, otherwise the defaults
pub fn load_config_or_default(path: Option<&Path>) -> ConfigResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}
