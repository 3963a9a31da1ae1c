use std::env::var;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::infrastructure::voice::http::VoiceClientConfig;

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub log_level: String,
    /// Without it the service runs on in-memory storage.
    pub database_url: Option<String>,
    /// JSON roster loaded into in-memory storage.
    pub roster_seed: Option<PathBuf>,
    pub jwt_secret: String,
    pub jwt_expiration: Duration,
    pub voice: VoiceClientConfig,
    pub default_knowledge_base: Option<String>,
}

impl Config {
    pub fn try_parse() -> Result<Config, String> {
        let _ = dotenv();
        Self::from_lookup(|name| var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, String> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("An error occured while getting {name} env param"))
        };

        Ok(Config {
            port: required("PORT")?
                .parse::<u16>()
                .map_err(|_| "An error occured while parsing PORT env param".to_string())?,
            scheme: required("SCHEME")?,
            host: required("HOST")?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            roster_seed: lookup("ROSTER_SEED")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration: Duration::from_secs(
                parse("JWT_EXPIRATION_SECS", lookup("JWT_EXPIRATION_SECS"))?.unwrap_or(3600),
            ),
            voice: VoiceClientConfig {
                base_url: required("VOICE_API_URL")?,
                api_key: required("VOICE_API_KEY")?,
                timeout: parse("VOICE_API_TIMEOUT_SECS", lookup("VOICE_API_TIMEOUT_SECS"))?
                    .map(Duration::from_secs),
                voice: lookup("VOICE_NAME").unwrap_or_else(|| "maya".to_string()),
                model: lookup("VOICE_MODEL").unwrap_or_else(|| "enhanced".to_string()),
                max_duration_minutes: parse(
                    "VOICE_MAX_DURATION_MINUTES",
                    lookup("VOICE_MAX_DURATION_MINUTES"),
                )?
                .unwrap_or(12),
                wait_for_greeting: parse(
                    "VOICE_WAIT_FOR_GREETING",
                    lookup("VOICE_WAIT_FOR_GREETING"),
                )?
                .unwrap_or(true),
                interruption_threshold: parse(
                    "VOICE_INTERRUPTION_THRESHOLD",
                    lookup("VOICE_INTERRUPTION_THRESHOLD"),
                )?
                .unwrap_or(100),
                temperature: parse("VOICE_TEMPERATURE", lookup("VOICE_TEMPERATURE"))?
                    .unwrap_or(0.7),
            },
            default_knowledge_base: lookup("DEFAULT_KNOWLEDGE_BASE_ID")
                .filter(|v| !v.trim().is_empty()),
        })
    }
}

fn parse<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, String> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| format!("An error occured while parsing {name} env param"))
        })
        .transpose()
}
