// Tracing setup for binaries and tests that embed the engine.
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

// Install a formatting subscriber filtered by RUST_LOG, falling back to info.
// Calling this more than once is harmless.
pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(true)
            .try_init();
    });
}
