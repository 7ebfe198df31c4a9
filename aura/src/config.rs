use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub relay: RelayConfig,
    pub location: LocationConfig,
    pub vision: Option<VisionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// Tuning knobs for the WebSocket relay.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Outbound queue depth per connected peer. When a slow observer's
    /// queue is full, events for that peer are dropped rather than
    /// slowing the sender.
    pub channel_capacity: usize,
    /// Maximum accepted HTTP/WS body size. Base64 video frames are large.
    pub max_body_bytes: usize,
    /// Connections with no inbound traffic for this long are closed.
    pub idle_timeout_secs: u64,
}

/// Fallback coordinate served before any live or persisted fix exists.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub fallback_lat: f64,
    pub fallback_lng: f64,
}

/// Vision model configuration for describe queries.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("AURA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("AURA_PORT", 5000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:aura.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            relay: RelayConfig {
                channel_capacity: parse_env_or("RELAY_CHANNEL_CAPACITY", 32),
                max_body_bytes: parse_env_or("RELAY_MAX_BODY_BYTES", 50 * 1024 * 1024),
                idle_timeout_secs: parse_env_or("RELAY_IDLE_TIMEOUT_SECS", 300),
            },
            location: LocationConfig {
                fallback_lat: parse_env_or("LOCATION_FALLBACK_LAT", 13.0827),
                fallback_lng: parse_env_or("LOCATION_FALLBACK_LNG", 80.2707),
            },
            vision: env::var("VISION_MODEL").ok().map(|model| VisionConfig {
                model,
                api_key: env::var("VISION_API_KEY").ok(),
                base_url: env::var("VISION_BASE_URL").ok(),
                timeout_secs: parse_env_or("VISION_TIMEOUT", 30),
                max_retries: parse_env_or("VISION_MAX_RETRIES", 3),
                max_tokens: parse_env_or("VISION_MAX_TOKENS", 150),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known vision providers that use OpenAI-compatible APIs
pub const KNOWN_VISION_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse a model name into a (provider, model) tuple.
pub fn parse_vision_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_VISION_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn config_defaults_without_env() {
        env::remove_var("AURA_HOST");
        env::remove_var("AURA_PORT");
        env::remove_var("VISION_MODEL");
        env::remove_var("RELAY_CHANNEL_CAPACITY");

        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.relay.channel_capacity, 32);
        assert_eq!(config.relay.idle_timeout_secs, 300);
        assert!(config.vision.is_none());
    }

    #[test]
    #[serial]
    fn fallback_coordinate_defaults() {
        env::remove_var("LOCATION_FALLBACK_LAT");
        env::remove_var("LOCATION_FALLBACK_LNG");

        let config = Config::default();
        assert_eq!(config.location.fallback_lat, 13.0827);
        assert_eq!(config.location.fallback_lng, 80.2707);
    }

    #[test]
    #[serial]
    fn vision_config_from_env() {
        env::set_var("VISION_MODEL", "openai/gpt-4o");
        env::set_var("VISION_MAX_TOKENS", "200");

        let config = Config::default();
        let vision = config.vision.expect("vision config");
        assert_eq!(vision.model, "openai/gpt-4o");
        assert_eq!(vision.max_tokens, 200);
        assert_eq!(vision.max_retries, 3);

        env::remove_var("VISION_MODEL");
        env::remove_var("VISION_MAX_TOKENS");
    }

    #[test]
    fn provider_model_parsing() {
        assert_eq!(parse_vision_provider_model("openai/gpt-4o"), ("openai", "gpt-4o"));
        assert_eq!(
            parse_vision_provider_model("ollama/llava:13b"),
            ("ollama", "llava:13b")
        );
        assert_eq!(parse_vision_provider_model("my-model"), ("local", "my-model"));
        assert_eq!(
            parse_vision_provider_model("unknown/model"),
            ("local", "unknown/model")
        );
    }

    #[test]
    #[serial]
    fn invalid_env_value_falls_back_to_default() {
        env::set_var("AURA_PORT", "not-a-port");
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        env::remove_var("AURA_PORT");
    }
}
