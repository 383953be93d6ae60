use yew::prelude::*;

/// Runtime knobs for the client. Everything the pages treat as a constant lives here so it
/// can be threaded through context instead of being scattered as literals.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u32,
    pub page_limit: u32,
    pub guard_rail: GuardRailConfig,
    pub tiktok_connect_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuardRailConfig {
    pub min: f64,
    pub max: f64,
    pub suppress_for_ms: i64,
}

pub const TOKEN_KEY: &str = "wish-token";
pub const PURCHASE_GUARD_KEY: &str = "wish-purchase-guard-until";
pub const SALE_GUARD_KEY: &str = "wish-sale-guard-until";

const DEFAULT_API_BASE_URL: &str = "https://wishmanagement-be";
const DEFAULT_TIKTOK_CONNECT_URL: &str = "http://localhost:3003/tiktok/connect";

impl Default for GuardRailConfig {
    fn default() -> Self {
        Self {
            min: 10_000.0,
            max: 900_000.0,
            suppress_for_ms: 24 * 60 * 60 * 1000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: 1000,
            page_limit: 10,
            guard_rail: GuardRailConfig::default(),
            tiktok_connect_url: DEFAULT_TIKTOK_CONNECT_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Build the config, honouring overrides baked in at compile time (trunk/wasm builds have
    /// no process environment to read at runtime).
    pub fn from_build_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: option_env!("WISH_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            poll_interval_ms: option_env!("WISH_POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.poll_interval_ms),
            page_limit: option_env!("WISH_PAGE_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.page_limit),
            guard_rail: defaults.guard_rail,
            tiktok_connect_url: option_env!("WISH_TIKTOK_CONNECT_URL")
                .map(str::to_string)
                .unwrap_or(defaults.tiktok_connect_url),
        }
    }
}

#[hook]
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.page_limit, 10);
        assert_eq!(config.guard_rail.min, 10_000.0);
        assert_eq!(config.guard_rail.max, 900_000.0);
        assert_eq!(config.guard_rail.suppress_for_ms, 86_400_000);
    }

    #[test]
    fn build_env_config_has_no_trailing_slash() {
        let config = AppConfig::from_build_env();
        assert!(!config.api_base_url.ends_with('/'));
        assert!(config.page_limit > 0);
    }
}
