//! Stderr logging via env_logger
//!
//! Defaults to `info`; `RUST_LOG` overrides the filter (e.g.
//! `RUST_LOG=debug` or `RUST_LOG=gh_client=debug`).

use env_logger::Env;

/// Initialize the global logger. Must be called once, before any logging.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}
