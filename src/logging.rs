use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Filter variable, in `EnvFilter` syntax (e.g. `salescast=debug`).
pub(crate) const LOG_ENV: &str = "SALESCAST_LOG";

const DEFAULT_FILTER: &str = "salescast=warn";

/// Install the stderr subscriber. Safe to call more than once.
pub(crate) fn init() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
