use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::orchestrator::EngineConfig;
use crate::providers::{
    OpenverseConfig, PexelsConfig, PixabayConfig, PlaceholderConfig, UnsplashConfig,
    WikimediaConfig,
};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Image provider configuration.
///
/// Keyed providers are only registered when their section is present.
/// Keyless providers are on unless `enabled = false`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsplash: Option<UnsplashConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pexels: Option<PexelsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixabay: Option<PixabayConfig>,
    #[serde(default)]
    pub wikimedia: WikimediaConfig,
    #[serde(default)]
    pub openverse: OpenverseConfig,
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub providers: SanitizedProvidersConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProvidersConfig {
    pub unsplash: SanitizedProviderConfig,
    pub pexels: SanitizedProviderConfig,
    pub pixabay: SanitizedProviderConfig,
    pub wikimedia: SanitizedProviderConfig,
    pub openverse: SanitizedProviderConfig,
    pub placeholder: SanitizedProviderConfig,
}

/// One provider's settings with credentials hidden.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SanitizedProviderConfig {
    pub enabled: bool,
    pub credentials_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_rpm: Option<u32>,
}

impl SanitizedProviderConfig {
    fn keyed(key: &str, base_url: &Option<String>, timeout_secs: u32, rate_limit_rpm: u32) -> Self {
        Self {
            enabled: true,
            credentials_configured: !key.trim().is_empty(),
            base_url: base_url.clone(),
            timeout_secs: Some(timeout_secs),
            rate_limit_rpm: Some(rate_limit_rpm),
        }
    }
}

impl From<&ProvidersConfig> for SanitizedProvidersConfig {
    fn from(p: &ProvidersConfig) -> Self {
        Self {
            unsplash: p
                .unsplash
                .as_ref()
                .map(|c| {
                    SanitizedProviderConfig::keyed(
                        &c.access_key,
                        &c.base_url,
                        c.timeout_secs,
                        c.rate_limit_rpm,
                    )
                })
                .unwrap_or_default(),
            pexels: p
                .pexels
                .as_ref()
                .map(|c| {
                    SanitizedProviderConfig::keyed(&c.api_key, &c.base_url, c.timeout_secs, c.rate_limit_rpm)
                })
                .unwrap_or_default(),
            pixabay: p
                .pixabay
                .as_ref()
                .map(|c| {
                    SanitizedProviderConfig::keyed(&c.api_key, &c.base_url, c.timeout_secs, c.rate_limit_rpm)
                })
                .unwrap_or_default(),
            wikimedia: SanitizedProviderConfig {
                enabled: p.wikimedia.enabled,
                credentials_configured: false,
                base_url: p.wikimedia.base_url.clone(),
                timeout_secs: Some(p.wikimedia.timeout_secs),
                rate_limit_rpm: Some(p.wikimedia.rate_limit_rpm),
            },
            openverse: SanitizedProviderConfig {
                enabled: p.openverse.enabled,
                credentials_configured: p
                    .openverse
                    .api_token
                    .as_deref()
                    .is_some_and(|t| !t.trim().is_empty()),
                base_url: p.openverse.base_url.clone(),
                timeout_secs: Some(p.openverse.timeout_secs),
                rate_limit_rpm: Some(p.openverse.rate_limit_rpm),
            },
            placeholder: SanitizedProviderConfig {
                enabled: p.placeholder.enabled,
                base_url: p.placeholder.base_url.clone(),
                ..Default::default()
            },
        }
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            engine: config.engine.clone(),
            providers: SanitizedProvidersConfig::from(&config.providers),
        }
    }
}
