//! Logging set-up and span helpers.

use std::sync::Once;

use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::envelope::VersionInfo;

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs.
    Json,
    /// Human-readable logs.
    #[default]
    Pretty,
}

/// Installs a global `tracing` subscriber.
///
/// Safe to call multiple times; only the first call has an effect. If the
/// host application already installed a subscriber, that one is kept.
///
/// # Environment Variables
///
/// - `RUST_LOG`: log filter, e.g. `info` or `fedex_client=debug`. Defaults
///   to `info`.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let installed = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already set, keeping it");
        }
    });
}

/// Span covering one dispatched request.
#[must_use]
pub fn request_span(call_id: u64, version: &VersionInfo) -> Span {
    tracing::info_span!(
        "fedex_request",
        call_id,
        service = %version.service_id,
        major = version.major,
    )
}
