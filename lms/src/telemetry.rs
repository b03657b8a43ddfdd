//! Tracing initialization.
//!
//! Log verbosity is controlled by `RUST_LOG` using the usual `EnvFilter`
//! directives, defaulting to `info`:
//!
//! ```bash
//! RUST_LOG=lms=debug,tower_http=debug,sqlx=warn
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber: an env filter plus console (fmt) output.
///
/// Fails if a global subscriber has already been set.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    info!("Telemetry initialized");

    Ok(())
}
