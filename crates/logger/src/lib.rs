//! Logging setup shared by the workspace binaries.
//!
//! Diagnostics go through the `log` facade and are filtered with `RUST_LOG`.
//! User-facing progress output stays on stdout and is not affected.

use std::io::Write;

use env_logger::{Builder, Env};

pub const DEFAULT_FILTER: &str = "info";

/// Initialise logging with the default `info` filter.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialise logging, falling back to `default_filter` when `RUST_LOG` is unset.
/// Calling it more than once is harmless.
pub fn init_with_filter(default_filter: &str) {
    let _ = builder(default_filter).try_init();
}

fn builder(default_filter: &str) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder
}
