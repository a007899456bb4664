//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Filter via `STACKSCAN_LOG` (e.g. `STACKSCAN_LOG=stackscan_analysis=debug`),
/// defaulting to `info`. Safe to call more than once; subsequent calls are
/// no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("STACKSCAN_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
