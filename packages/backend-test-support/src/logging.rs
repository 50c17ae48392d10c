//! Test log capture.
//!
//! Every test binary (unit and integration) calls [`init`] from a `ctor`, so
//! the first call wins and later calls are no-ops.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Filter source: `TEST_LOG`, then `RUST_LOG`, then `warn`.
fn test_filter() -> EnvFilter {
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Install a subscriber that writes through the test harness capture.
///
/// `TEST_LOG_FORMAT=json` switches to the JSON layout used in production,
/// which helps when checking which fields a security event carries.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let json = std::env::var("TEST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
        let builder = fmt()
            .with_env_filter(test_filter())
            .with_test_writer()
            .without_time();

        // try_init: another subscriber may already be installed in this process.
        let _ = if json {
            builder.json().flatten_event(true).try_init()
        } else {
            builder.with_target(false).try_init()
        };
    });
}
