// SPDX-License-Identifier: MPL-2.0
//! Console logging for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. `RUST_LOG` takes precedence over the default level.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Installs a stderr subscriber. `verbose` lowers the default level to debug.
///
/// Does nothing if a global subscriber is already installed.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(console)
        .try_init()
        .is_err()
    {
        tracing::debug!("subscriber already installed");
    }
}
