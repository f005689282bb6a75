use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

static INIT: Once = Once::new();

/// Sets up the global tracing subscriber.
///
/// The level comes from the `LOGLEVEL` environment variable (`ERROR`, `WARN`,
/// `INFO`, `DEBUG`, `TRACE`) and defaults to `INFO`. Calling it more than once is
/// harmless.
pub fn setup_logger() {
    INIT.call_once(|| {
        let log_level = env::var("LOGLEVEL")
            .unwrap_or_else(|_| "INFO".to_string())
            .to_uppercase();

        let level = match log_level.as_str() {
            "ERROR" => Level::ERROR,
            "WARN" => Level::WARN,
            "DEBUG" => Level::DEBUG,
            "TRACE" => Level::TRACE,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!("Global subscriber already installed");
        }
    });
}
