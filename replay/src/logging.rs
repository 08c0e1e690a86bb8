//! Tracing setup for tests that drive a replay session.

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call from every test; only the first
/// call installs a subscriber.
///
/// Uses `RUST_LOG` when set, otherwise `info,http_replay=debug`, so a failing
/// replay shows the recorded exchange next to the live request.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,http_replay=debug"));
        install(filter);
    });
}

/// Same as [`init_test_tracing`] with an explicit filter, ignoring `RUST_LOG`.
pub fn init_test_tracing_with_filter(filter: &str) {
    INIT.call_once(|| install(EnvFilter::new(filter)));
}

fn install(filter: EnvFilter) {
    // another harness in the same binary may already own the global subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .compact(),
        )
        .try_init();
}
