//! Tracing subscriber setup for hosts embedding RoomSync.
//!
//! The reconciler and mirror always log through `tracing`; nothing is
//! printed until a host calls [`init_tracing`] once at startup.
//!
//! | Source | Controls |
//! |---|---|
//! | [`SessionConfig::log_format`] (`ROOMSYNC_LOG_FORMAT`) | compact or JSON console lines |
//! | `RUST_LOG` | filter directives, `info` when unset or blank |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | enables span export over OTLP/HTTP |
//! | [`SessionConfig::service_name`] | `service.name` on exported spans |
//!
//! ```rust,no_run
//! use roomsync_runtime::{SessionConfig, init_tracing};
//!
//! let _guard = init_tracing(&SessionConfig::default());
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, SessionConfig};

const DEFAULT_DIRECTIVES: &str = "info";
const TRACER_NAME: &str = "roomsync";

// ─────────────────────────────────────────────────────────────────────────────
// Console output selection
// ─────────────────────────────────────────────────────────────────────────────

/// What the console layer prints and which events pass the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConsoleOutput {
    pub format: LogFormat,
    pub directives: String,
}

impl ConsoleOutput {
    /// Combine the configured format with the raw `RUST_LOG` value.
    pub fn select(config: &SessionConfig, rust_log: Option<&str>) -> Self {
        let directives = rust_log
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .unwrap_or(DEFAULT_DIRECTIVES)
            .to_string();
        Self {
            format: config.log_format,
            directives,
        }
    }

    /// Directives that do not parse fall back to the default level.
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directives).unwrap_or_else(|e| {
            eprintln!("roomsync: ignoring RUST_LOG `{}`: {e}", self.directives);
            EnvFilter::new(DEFAULT_DIRECTIVES)
        })
    }
}

/// Collector endpoint from the raw `OTEL_EXPORTER_OTLP_ENDPOINT` value.
pub(crate) fn otlp_endpoint(raw: Option<String>) -> Option<String> {
    raw.map(|endpoint| endpoint.trim().to_string())
        .filter(|endpoint| !endpoint.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Install the global subscriber for `config`.
///
/// Calling it again once a subscriber is installed leaves the first one in
/// place. Keep the returned guard alive until shutdown so buffered spans are
/// flushed.
pub fn init_tracing(config: &SessionConfig) -> TracerProviderGuard {
    let output = ConsoleOutput::select(config, std::env::var("RUST_LOG").ok().as_deref());
    let json = output.format == LogFormat::Json;

    let provider = otlp_endpoint(std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok())
        .and_then(|endpoint| build_provider(endpoint, &config.service_name));
    let otel = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(TRACER_NAME)));

    let installed = tracing_subscriber::registry()
        .with(output.filter())
        .with(otel)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer().compact()))
        .try_init();
    if let Err(e) = installed {
        eprintln!("roomsync: tracing subscriber already installed: {e}");
    }

    TracerProviderGuard { provider }
}

/// Flushes and shuts down span export when dropped.
pub struct TracerProviderGuard {
    provider: Option<SdkTracerProvider>,
}

impl TracerProviderGuard {
    /// `true` when spans are being exported to a collector.
    pub fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TracerProviderGuard {
    fn drop(&mut self) {
        let Some(provider) = self.provider.take() else {
            return;
        };
        if let Err(e) = provider.shutdown() {
            eprintln!("roomsync: span exporter did not shut down cleanly: {e}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Exporter
// ─────────────────────────────────────────────────────────────────────────────

fn build_provider(endpoint: String, service_name: &str) -> Option<SdkTracerProvider> {
    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("roomsync: span export disabled: {e}");
            return None;
        }
    };

    // Passes run on the caller's thread with no async runtime, so spans are
    // exported synchronously.
    let provider = SdkTracerProvider::builder()
        .with_resource(
            Resource::builder()
                .with_service_name(service_name.to_string())
                .build(),
        )
        .with_simple_exporter(exporter)
        .build();
    Some(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_defaults_to_info_when_rust_log_missing_or_blank() {
        let config = SessionConfig::default();
        assert_eq!(ConsoleOutput::select(&config, None).directives, "info");
        assert_eq!(ConsoleOutput::select(&config, Some("  ")).directives, "info");
    }

    #[test]
    fn select_keeps_rust_log_directives_and_config_format() {
        let config = SessionConfig {
            log_format: LogFormat::Json,
            ..SessionConfig::default()
        };
        let output = ConsoleOutput::select(&config, Some(" roomsync_anchor=debug "));
        assert_eq!(
            output,
            ConsoleOutput {
                format: LogFormat::Json,
                directives: "roomsync_anchor=debug".to_string(),
            }
        );
    }

    #[test]
    fn otlp_endpoint_ignores_blank_values() {
        assert_eq!(otlp_endpoint(None), None);
        assert_eq!(otlp_endpoint(Some(" ".to_string())), None);
        assert_eq!(
            otlp_endpoint(Some("http://localhost:4318".to_string())),
            Some("http://localhost:4318".to_string())
        );
    }

    #[test]
    fn init_tracing_twice_keeps_first_subscriber() {
        let config = SessionConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        tracing::info!("subscriber installed");
        drop(second);
        drop(first);
    }

    #[test]
    fn guard_without_provider_is_not_exporting() {
        let guard = TracerProviderGuard { provider: None };
        assert!(!guard.is_exporting());
    }
}
