//! Tracing subscriber setup for the desktop host.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str =
    "pqa_core=info,pqa_infrastructure=info,pqa_client=info,pqa_application=info";

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_directive`. Calling it again after a
/// subscriber is installed is a no-op.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("[Telemetry] Subscriber already installed");
    }

    Ok(())
}
