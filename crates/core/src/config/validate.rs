use super::{Config, ConfigError};

/// Largest page size the provider will be asked for.
const MAX_PAGE_SIZE_HINT: u64 = 100;

/// Validate cross-field constraints that serde defaults cannot express.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.provider.open_library.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "provider.open_library.url must not be empty".to_string(),
        ));
    }
    if config.provider.open_library.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.open_library.timeout_secs must be positive".to_string(),
        ));
    }
    if config.session.cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "session.cache.capacity must be positive".to_string(),
        ));
    }
    if config.session.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "session.cache.ttl_secs must be positive".to_string(),
        ));
    }
    if config.session.history.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "session.history.capacity must be positive".to_string(),
        ));
    }
    if config.session.analytics.trending_window_hours == 0 {
        return Err(ConfigError::ValidationError(
            "session.analytics.trending_window_hours must be positive".to_string(),
        ));
    }
    if config.session.suggestion_limit == 0
        || config.session.suggestion_limit as u64 > MAX_PAGE_SIZE_HINT
    {
        return Err(ConfigError::ValidationError(format!(
            "session.suggestion_limit must be between 1 and {}",
            MAX_PAGE_SIZE_HINT
        )));
    }

    Ok(())
}
