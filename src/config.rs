use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// A whole lecture hall can share one NAT address, so the check-in limit
/// is sized per room, not per student.
pub const DEFAULT_RATE_CHECKIN_PER_MIN: u32 = 600;
pub const DEFAULT_RATE_API_PER_MIN: u32 = 1000;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Unset means the in-memory blob store is used.
    pub database_url: Option<String>,
    pub api_prefix: String,
    pub log_dir: String,

    // Rate limiting
    pub rate_checkin_per_min: u32,
    pub rate_api_per_min: u32,

    pub roster_cache_ttl_secs: u64,

    // Remediation text generation
    pub ai_base_url: String,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_timeout_secs: u64,

    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            api_prefix: var_or("API_PREFIX", "/api"),
            log_dir: var_or("LOG_DIR", "logs"),

            rate_checkin_per_min: parse_or("RATE_CHECKIN_PER_MIN", DEFAULT_RATE_CHECKIN_PER_MIN)?,
            rate_api_per_min: parse_or("RATE_API_PER_MIN", DEFAULT_RATE_API_PER_MIN)?,

            roster_cache_ttl_secs: parse_or("ROSTER_CACHE_TTL_SECS", 300)?, // default 5 min

            ai_base_url: var_or("AI_BASE_URL", "https://api.openai.com/v1"),
            ai_api_key: env::var("AI_API_KEY").ok().filter(|v| !v.is_empty()),
            ai_model: var_or("AI_MODEL", "gpt-4o-mini"),
            ai_timeout_secs: parse_or("AI_TIMEOUT_SECS", 30)?,

            seed_demo_data: parse_or("SEED_DEMO_DATA", false)?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            rate_checkin_per_min: DEFAULT_RATE_CHECKIN_PER_MIN,
            rate_api_per_min: DEFAULT_RATE_API_PER_MIN,
            roster_cache_ttl_secs: 60,
            ai_base_url: "http://localhost".to_string(),
            ai_api_key: None,
            ai_model: "test-model".to_string(),
            ai_timeout_secs: 1,
            seed_demo_data: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_when_unset() {
        let value: u32 = parse_or("ROLLCALL_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn malformed_value_is_a_startup_error() {
        // SAFETY: no other test reads this variable
        unsafe { env::set_var("ROLLCALL_TEST_MALFORMED_BOOL", "1") };
        let err = parse_or::<bool>("ROLLCALL_TEST_MALFORMED_BOOL", false).unwrap_err();
        assert!(err.to_string().contains("ROLLCALL_TEST_MALFORMED_BOOL"));

        unsafe { env::set_var("ROLLCALL_TEST_MALFORMED_U32", "thirty") };
        assert!(parse_or::<u32>("ROLLCALL_TEST_MALFORMED_U32", 30).is_err());
    }
}
