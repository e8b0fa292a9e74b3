use std::env;
use tracing::warn;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_CHAT_SERVICE_URL: &str = "http://localhost:5001";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub chat_service_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_hours: parse_or_default("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS),
            chat_service_url: env::var("CHAT_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("CHAT_SERVICE_URL not set, using default");
                    DEFAULT_CHAT_SERVICE_URL.to_string()
                }),
            port: parse_or_default("PORT", DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_api_key.is_empty()
            && !self.jwt_secret.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured_requires_store_and_secret() {
        let mut config = AppConfig {
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "key".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            chat_service_url: DEFAULT_CHAT_SERVICE_URL.to_string(),
            port: DEFAULT_PORT,
        };
        assert!(config.is_configured());

        config.jwt_secret.clear();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_parse_or_default_falls_back_on_garbage() {
        env::set_var("KROMIUM_TEST_TTL", "not-a-number");
        assert_eq!(parse_or_default("KROMIUM_TEST_TTL", 24i64), 24);

        env::set_var("KROMIUM_TEST_TTL", " 48 ");
        assert_eq!(parse_or_default("KROMIUM_TEST_TTL", 24i64), 48);

        env::remove_var("KROMIUM_TEST_TTL");
        assert_eq!(parse_or_default("KROMIUM_TEST_TTL", 24i64), 24);
    }
}
