use std::env;

/// Policy applied when the trade source returns a non-success response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log a warning and continue the scan with zero trades.
    Degrade,
    /// Surface the failure as an error and abort the scan.
    Strict,
}

/// Tie-break policy for the correlation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Attach the first post in input order inside the match window.
    First,
    /// Attach the closest-in-time post inside the match window.
    Nearest,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tracked_account: String,
    pub tracked_wallet: String,
    pub post_lookback_minutes: i64,
    pub trade_lookback_minutes: i64,
    pub match_window_secs: i64,
    pub db_path: String,
    pub post_api_url: String,
    pub trade_api_url: String,
    pub trade_source_policy: FailurePolicy,
    pub match_strategy: MatchStrategy,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

fn env_i64(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(raw) => raw.parse::<i64>().unwrap_or_else(|_| {
            log::warn!("Invalid {} '{}', defaulting to {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables (`.env` honored by the
    /// binary before this is called).
    pub fn from_env() -> Result<Self, ConfigError> {
        let tracked_account = env::var("TRACKED_ACCOUNT")
            .map_err(|_| ConfigError::MissingVariable("TRACKED_ACCOUNT".to_string()))?;
        let tracked_wallet = env::var("TRACKED_WALLET")
            .map_err(|_| ConfigError::MissingVariable("TRACKED_WALLET".to_string()))?;

        let post_api_url = env::var("POST_API_URL")
            .map_err(|_| ConfigError::MissingVariable("POST_API_URL".to_string()))?;
        if !post_api_url.starts_with("http://") && !post_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "POST_API_URL must start with http:// or https://".to_string(),
            ));
        }

        let trade_api_url = env::var("TRADE_API_URL")
            .unwrap_or_else(|_| "https://public-api.solscan.io".to_string());

        let policy_str = env::var("TRADE_SOURCE_POLICY").unwrap_or_else(|_| "degrade".to_string());
        let trade_source_policy = match policy_str.to_lowercase().as_str() {
            "degrade" => FailurePolicy::Degrade,
            "strict" => FailurePolicy::Strict,
            _ => {
                log::warn!(
                    "Invalid TRADE_SOURCE_POLICY '{}', defaulting to degrade",
                    policy_str
                );
                FailurePolicy::Degrade
            }
        };

        let strategy_str = env::var("MATCH_STRATEGY").unwrap_or_else(|_| "first".to_string());
        let match_strategy = match strategy_str.to_lowercase().as_str() {
            "first" => MatchStrategy::First,
            "nearest" => MatchStrategy::Nearest,
            _ => {
                log::warn!("Invalid MATCH_STRATEGY '{}', defaulting to first", strategy_str);
                MatchStrategy::First
            }
        };

        Ok(Self {
            tracked_account,
            tracked_wallet,
            post_lookback_minutes: env_i64("POST_LOOKBACK_MINUTES", 60),
            trade_lookback_minutes: env_i64("TRADE_LOOKBACK_MINUTES", 60),
            match_window_secs: env_i64("MATCH_WINDOW_SECS", 1800),
            db_path: env::var("POSTFLOW_DB_PATH").unwrap_or_else(|_| "data/postflow.db".to_string()),
            post_api_url,
            trade_api_url,
            trade_source_policy,
            match_strategy,
        })
    }
}
