use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "info";

/// Installs the global fmt subscriber. Safe to call from every binary and
/// test; only the first call wins.
pub fn init(service_name: &str) {
    init_with_filter(service_name, DEFAULT_FILTER);
}

/// Same as [`init`] but with an explicit fallback directive, used when
/// `RUST_LOG` is not set. CLI tools pass `"warn"` so table output stays clean.
pub fn init_with_filter(service_name: &str, fallback: &str) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        // try_init: test harnesses may have installed a subscriber already
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init();
    });

    info!(service = service_name, "telemetry initialized");
}
