use crate::error::ConfigError;
use crate::models::{Category, HighscoreType};
use crate::services::feed_service::default_base_url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Smallest payload limit that still leaves room for a header line, one
/// report line and the truncation marker.
pub const MIN_PAYLOAD_LIMIT: usize = 200;

/// Longest accepted code-block language tag. Together with
/// `MIN_PAYLOAD_LIMIT` this keeps the report header, truncation marker and
/// closing fence within any accepted payload limit.
pub const MAX_CODE_SYNTAX_LEN: usize = 32;

/// Bounded retry schedule shared by the feed client and the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(6, Duration::from_secs(10))
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_name: String,
    pub server_number: u32,
    pub community: String,
    pub webhook_url: String,
    pub category: Category,
    pub highscore_type: HighscoreType,
    pub baseline_path: PathBuf,
    pub code_syntax: String,
    pub payload_limit: usize,
    pub wake_interval_secs: u64,
    pub min_check_interval_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub feed_base_url: Option<String>,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_number = get("SERVER_NUMBER")
            .ok_or(ConfigError::Missing("SERVER_NUMBER"))?
            .trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::Invalid {
                key: "SERVER_NUMBER",
                reason: format!("{}", e),
            })?;
        let community = get("COMMUNITY").ok_or(ConfigError::Missing("COMMUNITY"))?;
        let webhook_url = get("WEBHOOK_URL").ok_or(ConfigError::Missing("WEBHOOK_URL"))?;

        let category_code = parse_or(get("HIGHSCORE_CATEGORY"), 1u8);
        let category = Category::from_code(category_code).ok_or_else(|| ConfigError::Invalid {
            key: "HIGHSCORE_CATEGORY",
            reason: format!("{} is not 1 (players) or 2 (alliances)", category_code),
        })?;
        let type_code = parse_or(get("HIGHSCORE_TYPE"), HighscoreType::MilitaryLost.code());
        let highscore_type = HighscoreType::from_code(type_code).ok_or_else(|| ConfigError::Invalid {
            key: "HIGHSCORE_TYPE",
            reason: format!("{} is outside 0..=11", type_code),
        })?;

        let payload_limit = parse_or(get("PAYLOAD_LIMIT"), 2000usize);
        if payload_limit < MIN_PAYLOAD_LIMIT {
            return Err(ConfigError::Invalid {
                key: "PAYLOAD_LIMIT",
                reason: format!("must be at least {}", MIN_PAYLOAD_LIMIT),
            });
        }

        let code_syntax = lookup("CODE_SYNTAX").unwrap_or_default().trim().to_string();
        if code_syntax.chars().count() > MAX_CODE_SYNTAX_LEN {
            return Err(ConfigError::Invalid {
                key: "CODE_SYNTAX",
                reason: format!("longer than {} characters", MAX_CODE_SYNTAX_LEN),
            });
        }
        if code_syntax.contains(|c: char| c.is_whitespace() || c == '`') {
            return Err(ConfigError::Invalid {
                key: "CODE_SYNTAX",
                reason: "must be a single word without backticks".into(),
            });
        }

        Ok(Self {
            bot_name: get("BOT_NAME").unwrap_or_else(|| "highscore-bot".into()),
            server_number,
            community: community.trim().to_string(),
            webhook_url,
            category,
            highscore_type,
            baseline_path: get("BASELINE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/baseline.json")),
            code_syntax,
            payload_limit,
            wake_interval_secs: parse_or(get("WAKE_INTERVAL_SECS"), 60),
            min_check_interval_secs: parse_or(get("MIN_CHECK_INTERVAL_SECS"), 3600),
            max_attempts: parse_or(get("MAX_ATTEMPTS"), 6u32).max(1),
            retry_delay_secs: parse_or(get("RETRY_DELAY_SECS"), 10),
            feed_base_url: get("FEED_BASE_URL"),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_file: get("LOG_FILE").map(PathBuf::from),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    pub fn wake_interval(&self) -> Duration {
        Duration::from_secs(self.wake_interval_secs)
    }

    pub fn feed_base_url(&self) -> String {
        self.feed_base_url
            .clone()
            .unwrap_or_else(|| default_base_url(self.server_number, &self.community))
    }

    pub fn server_label(&self) -> String {
        format!("{}{}", self.community, self.server_number)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("SERVER_NUMBER", "123"),
        ("COMMUNITY", "fr"),
        ("WEBHOOK_URL", "https://chat.example/hook"),
    ];

    #[test]
    fn defaults_apply() {
        let config = BotConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.server_number, 123);
        assert_eq!(config.category, Category::Players);
        assert_eq!(config.highscore_type, HighscoreType::MilitaryLost);
        assert_eq!(config.payload_limit, 2000);
        assert_eq!(config.wake_interval(), Duration::from_secs(60));
        assert_eq!(config.min_check_interval_secs, 3600);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.code_syntax, "");
        assert_eq!(config.feed_base_url(), "https://s123-fr.ogame.gameforge.com");
        assert_eq!(config.server_label(), "fr123");
    }

    #[test]
    fn missing_webhook_is_rejected() {
        let err = BotConfig::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("WEBHOOK_URL")));
    }

    #[test]
    fn bad_server_number_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("SERVER_NUMBER", "abc");
        let err = BotConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SERVER_NUMBER", .. }));
    }

    #[test]
    fn type_and_limit_are_validated() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HIGHSCORE_TYPE", "12"));
        assert!(BotConfig::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PAYLOAD_LIMIT", "50"));
        assert!(BotConfig::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HIGHSCORE_TYPE", "6"));
        pairs.push(("CODE_SYNTAX", "ansi"));
        pairs.push(("FEED_BASE_URL", "http://127.0.0.1:9000"));
        let config = BotConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.highscore_type, HighscoreType::MilitaryDestroyed);
        assert_eq!(config.code_syntax, "ansi");
        assert_eq!(config.feed_base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn oversized_syntax_tag_is_rejected() {
        let long = "x".repeat(250);
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("CODE_SYNTAX", long.as_str()));
        let err = BotConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CODE_SYNTAX", .. }));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("CODE_SYNTAX", "a`b"));
        assert!(BotConfig::from_lookup(lookup(&pairs)).is_err());

        let longest = "x".repeat(MAX_CODE_SYNTAX_LEN);
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("CODE_SYNTAX", longest.as_str()));
        pairs.push(("PAYLOAD_LIMIT", "200"));
        let config = BotConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.code_syntax, longest);
        assert_eq!(config.payload_limit, MIN_PAYLOAD_LIMIT);
    }
}
