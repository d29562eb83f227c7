//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments
//! Features:
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs (never deleted)
//! - Permanent security logs (never deleted)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Every sink is boxed over the bare [`Registry`] so the whole stack
/// goes through one `with` call.
type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Clean up application log files older than 14 days
///
/// Audit and security logs are never touched.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    use chrono::{Local, TimeZone};

    let cutoff = Local::now() - chrono::Duration::days(14);

    let app_log_dir = log_dir.join("app");
    if app_log_dir.exists() {
        for entry in fs::read_dir(app_log_dir)? {
            let entry = entry?;
            let path = entry.path();

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Match app.YYYY-MM-DD pattern produced by the daily appender
            let Some(date_part) = name.strip_prefix("app.") else {
                continue;
            };
            let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
                continue;
            };
            if let Some(midnight) = naive_date.and_hms_opt(0, 0, 0)
                && let Some(local_datetime) = Local.from_local_datetime(&midnight).single()
                && local_datetime < cutoff
            {
                fs::remove_file(&path)?;
                tracing::info!(file = %name, "Deleted old log file");
            }
        }
    }

    Ok(())
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether console output uses JSON (true for production)
/// * `log_dir` - Optional directory for file logging
///
/// With a log directory, three file streams are written:
/// - `app/` - daily rotating application logs, cleaned up after 14 days
/// - `audit/` - business operations, kept forever
/// - `security/` - ownership violations and access denials, kept forever
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console = if json_format {
        console_json_layer(level)
    } else {
        console_pretty_layer(level)
    };
    let mut layers: Vec<BoxedLayer> = vec![env_filter.boxed(), console];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        layers.extend(file_layers(log_dir)?);
        tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));
    }

    tracing_subscriber::registry().with(layers).init();
    Ok(())
}

/// The three file streams: rotating app logs plus permanent audit and
/// security logs, split by tracing target
fn file_layers(log_dir: &Path) -> anyhow::Result<Vec<BoxedLayer>> {
    let app_log_dir = log_dir.join("app");
    let audit_log_dir = log_dir.join("audit");
    let security_log_dir = log_dir.join("security");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;
    fs::create_dir_all(&security_log_dir)?;

    // App stream carries everything that is not audit or security
    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
    let app_layer = file_layer(app_log)
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != "audit" && meta.target() != "security"
        }))
        .boxed();

    let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit");
    let audit_layer = file_layer(audit_log)
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "audit"
        }))
        .boxed();

    let security_log = RollingFileAppender::new(Rotation::DAILY, security_log_dir, "security");
    let security_layer = file_layer(security_log)
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "security"
        }))
        .boxed();

    Ok(vec![app_layer, audit_layer, security_layer])
}

fn console_json_layer(level: &str) -> BoxedLayer {
    fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new(level))
        .boxed()
}

fn console_pretty_layer(level: &str) -> BoxedLayer {
    fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new(level))
        .boxed()
}

fn file_layer(appender: RollingFileAppender) -> impl Layer<Registry> + Send + Sync {
    fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(appender))
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Audit log helper - records critical business operations
///
/// Audit logs land in permanent `audit/audit.YYYY-MM-DD` files.
///
/// # Examples
/// ```no_run
/// use order_server::audit_log;
///
/// // Order creation
/// audit_log!("user:42", "create", "order:ORD20250101120000AB12CD");
///
/// // Admin status change
/// audit_log!("admin:1", "update_status", "order:17", "Pending -> Confirmed");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($actor:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            actor = $actor,
            action = $action,
            resource = $resource,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($actor:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            actor = $actor,
            action = $action,
            resource = $resource,
            details = $details,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

/// Security log helper - records access denials and ownership violations
///
/// Security logs land in permanent `security/security.YYYY-MM-DD` files.
///
/// # Examples
/// ```no_run
/// use order_server::security_log;
///
/// // Ownership violation
/// security_log!(WARN, "ownership_violation", caller = 7, resource = "order:12");
///
/// // Missing admin role
/// security_log!(WARN, "admin_required", caller = 7, action = "delete_product");
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_layer_stack_builds_as_one_subscriber() {
        let dir = std::env::temp_dir().join(format!("order-server-log-test-{}", std::process::id()));

        let mut layers: Vec<BoxedLayer> = vec![
            EnvFilter::new("info").boxed(),
            console_json_layer("info"),
            console_pretty_layer("debug"),
        ];
        layers.extend(file_layers(&dir).unwrap());
        assert_eq!(layers.len(), 6);

        // Attach the whole stack without installing it globally
        let _subscriber = tracing_subscriber::registry().with(layers);

        assert!(dir.join("app").is_dir());
        assert!(dir.join("audit").is_dir());
        assert!(dir.join("security").is_dir());
        fs::remove_dir_all(&dir).ok();
    }
}
