//! Tracing setup for the command line.
//!
//! Log output goes to stderr so it never mixes with table or JSON output.
//! The filter comes from the `SQUAD_LOG` environment variable, falling back
//! to the configured `log_level`:
//! - `SQUAD_LOG=debug` for expansion sizes and resolved series keys
//! - `SQUAD_LOG=info` to see every create, update and delete
//! - `SQUAD_LOG=warn` for warnings and errors only (default)

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "SQUAD_LOG";

/// Initialize the logging system.
pub fn init(default_level: &str) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
