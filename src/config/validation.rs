use crate::config::types::{Config, CrawlerConfig, FetcherConfig};
use crate::{ConfigError, ConfigResult};

/// Upper bound for any configured timeout (seconds)
const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_fetcher_config(&config.fetcher)?;
    validate_crawler_config(&config.crawler)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    validate_timeout("timeout-secs", config.timeout_secs)?;
    validate_timeout("connect-timeout-secs", config.connect_timeout_secs)?;

    if config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs ({}) cannot exceed timeout-secs ({})",
            config.connect_timeout_secs, config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> ConfigResult<()> {
    if secs < 1 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    // An empty pattern is a substring of every URL and would drop everything
    if config.blacklist.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "blacklist patterns cannot be empty".to_string(),
        ));
    }

    Ok(())
}
