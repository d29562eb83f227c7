//! Server configuration

use chrono::NaiveTime;
use rust_decimal::Decimal;

/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | Tracing filter level |
/// | LOG_DIR | (unset) | Directory for rolling file logs |
/// | FREE_SHIPPING_THRESHOLD | 100000 | Subtotal at which shipping is free |
/// | FLAT_SHIPPING_FEE | 20000 | Shipping fee below the threshold |
/// | HAPPY_HOUR_START | 14:00 | Happy-hour window start (local time) |
/// | HAPPY_HOUR_END | 16:00 | Happy-hour window end (local time) |
/// | HAPPY_HOUR_DISCOUNT_PERCENT | 0 | Percent off inside the window; 0 disables |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Running environment: development | staging | production
    pub environment: String,
    /// Tracing filter level
    pub log_level: String,
    /// Optional directory for rolling file logs
    pub log_dir: Option<String>,
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Decimal,
    /// Flat shipping fee below the threshold
    pub flat_shipping_fee: Decimal,
    /// Happy-hour window start, local time of day
    pub happy_hour_start: NaiveTime,
    /// Happy-hour window end, local time of day
    pub happy_hour_end: NaiveTime,
    /// Percent off inside the happy-hour window; zero disables it
    pub happy_hour_discount_percent: Decimal,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            free_shipping_threshold: parse_decimal("FREE_SHIPPING_THRESHOLD", 100_000),
            flat_shipping_fee: parse_decimal("FLAT_SHIPPING_FEE", 20_000),
            happy_hour_start: parse_time("HAPPY_HOUR_START", 14),
            happy_hour_end: parse_time("HAPPY_HOUR_END", 16),
            happy_hour_discount_percent: parse_decimal("HAPPY_HOUR_DISCOUNT_PERCENT", 0),
        }
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_decimal(var: &str, default: i64) -> Decimal {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<Decimal>().ok())
        .unwrap_or_else(|| Decimal::from(default))
}

fn parse_time(var: &str, default_hour: u32) -> NaiveTime {
    std::env::var(var)
        .ok()
        .and_then(|v| NaiveTime::parse_from_str(&v, "%H:%M").ok())
        .unwrap_or_else(|| NaiveTime::from_hms_opt(default_hour, 0, 0).expect("valid hour"))
}
