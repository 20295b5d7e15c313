use super::{types::Config, ConfigError};
use crate::router::MAX_ATTEMPTS_CAP;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Engine attempt cap is within 1..=6
/// - No provider has a zero request budget
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if !(1..=MAX_ATTEMPTS_CAP).contains(&config.engine.max_attempts) {
        return Err(ConfigError::ValidationError(format!(
            "engine.max_attempts must be between 1 and {}",
            MAX_ATTEMPTS_CAP
        )));
    }

    let providers = &config.providers;
    let budgets = [
        ("unsplash", providers.unsplash.as_ref().map(|p| p.rate_limit_rpm)),
        ("pexels", providers.pexels.as_ref().map(|p| p.rate_limit_rpm)),
        ("pixabay", providers.pixabay.as_ref().map(|p| p.rate_limit_rpm)),
        ("wikimedia", Some(providers.wikimedia.rate_limit_rpm)),
        ("openverse", Some(providers.openverse.rate_limit_rpm)),
    ];
    for (name, rpm) in budgets {
        if rpm == Some(0) {
            return Err(ConfigError::ValidationError(format!(
                "providers.{}.rate_limit_rpm cannot be 0",
                name
            )));
        }
    }

    Ok(())
}
