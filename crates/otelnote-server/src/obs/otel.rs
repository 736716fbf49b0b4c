//! OTLP/gRPC push of the verb counters.
//!
//! The four counters are registered as observable instruments whose
//! callbacks read `NoteMetrics`. A `PeriodicReader` collects and exports on
//! its own tokio task, so request handling never waits on the collector.
//! Values are cumulative: when an export fails the SDK logs it and the next
//! interval carries the accumulated totals.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::metrics::{MeterProvider as _, ObservableCounter};
use opentelemetry::{InstrumentationScope, KeyValue};
use opentelemetry_otlp::{MetricExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::{runtime, Resource};

use otelnote_core::error::{NoteError, Result};

use crate::config::TelemetrySection;
use crate::obs::metrics::{NoteMetrics, Verb};

/// Give a bare `host:port` the scheme tonic needs.
///
/// `insecure` picks plaintext `http://`; otherwise `https://`. Addresses that
/// already carry a scheme are left alone.
pub fn resolve_endpoint(raw: &str, insecure: bool) -> String {
    let raw = raw.trim();
    if raw.contains("://") {
        return raw.to_string();
    }
    let scheme = if insecure { "http" } else { "https" };
    format!("{scheme}://{raw}")
}

/// Keeps the meter provider (and its reader task) alive.
pub struct TelemetryGuard {
    provider: Option<SdkMeterProvider>,
    _instruments: Vec<ObservableCounter<u64>>,
}

impl TelemetryGuard {
    /// A guard that exports nothing.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            _instruments: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Final collect + export, then stop the reader.
    pub fn shutdown(self) {
        let Some(provider) = self.provider else {
            return;
        };
        if let Err(e) = provider.force_flush() {
            tracing::warn!(error = %e, "final metrics flush failed");
        }
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "meter provider shutdown failed");
        } else {
            tracing::info!("metrics exporter stopped");
        }
    }
}

/// Register one observable counter per verb on `provider`.
///
/// Callbacks read `metrics` at collection time, so each export carries the
/// cumulative total.
pub fn register_counters(
    provider: &SdkMeterProvider,
    meter_name: &str,
    metrics: Arc<NoteMetrics>,
) -> Vec<ObservableCounter<u64>> {
    let scope = InstrumentationScope::builder(meter_name.to_string())
        .with_version(env!("CARGO_PKG_VERSION"))
        .build();
    let meter = provider.meter_with_scope(scope);

    Verb::ALL
        .iter()
        .map(|&verb| {
            let m = Arc::clone(&metrics);
            meter
                .u64_observable_counter(verb.counter_name())
                .with_description(verb.description())
                .with_callback(move |observer| observer.observe(m.value(verb), &[]))
                .build()
        })
        .collect()
}

/// Build the exporter pipeline. Must run inside a tokio runtime.
pub fn init(cfg: &TelemetrySection, metrics: Arc<NoteMetrics>) -> Result<TelemetryGuard> {
    if !cfg.enabled {
        tracing::info!("telemetry export disabled");
        return Ok(TelemetryGuard::disabled());
    }

    let endpoint = resolve_endpoint(&cfg.endpoint, cfg.insecure);
    let exporter = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint.clone())
        .build()
        .map_err(|e| NoteError::Internal(format!("otlp exporter build failed: {e}")))?;

    let reader = PeriodicReader::builder(exporter, runtime::Tokio)
        .with_interval(Duration::from_millis(cfg.export_interval_ms))
        .build();

    let provider = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            cfg.service_name.clone(),
        )]))
        .build();

    let instruments = register_counters(&provider, &cfg.meter_name, metrics);

    tracing::info!(
        %endpoint,
        interval_ms = cfg.export_interval_ms,
        meter = %cfg.meter_name,
        "otlp metrics exporter started"
    );

    Ok(TelemetryGuard {
        provider: Some(provider),
        _instruments: instruments,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use opentelemetry_sdk::metrics::data::Sum;
    use opentelemetry_sdk::testing::metrics::InMemoryMetricExporter;

    #[test]
    fn bare_address_gets_scheme() {
        assert_eq!(resolve_endpoint("localhost:4317", true), "http://localhost:4317");
        assert_eq!(resolve_endpoint("collector:4317", false), "https://collector:4317");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        assert_eq!(
            resolve_endpoint(" http://otel-collector:4317 ", false),
            "http://otel-collector:4317"
        );
    }

    #[test]
    fn disabled_guard_shuts_down_quietly() {
        let cfg = TelemetrySection {
            enabled: false,
            ..TelemetrySection::default()
        };
        let guard = init(&cfg, Arc::new(NoteMetrics::new())).unwrap_or_else(|_| TelemetryGuard::disabled());
        assert!(!guard.is_enabled());
        guard.shutdown();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn counters_export_registry_values() {
        let metrics = Arc::new(NoteMetrics::new());
        metrics.record(Verb::Post);
        metrics.record(Verb::Post);
        metrics.record(Verb::Get);

        let exporter = InMemoryMetricExporter::default();
        let reader = PeriodicReader::builder(exporter.clone(), runtime::Tokio).build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();
        let _instruments = register_counters(&provider, "otelnote-test", Arc::clone(&metrics));

        let flushed = provider.clone();
        tokio::task::spawn_blocking(move || flushed.force_flush())
            .await
            .unwrap()
            .unwrap();

        let exported = exporter.get_finished_metrics().unwrap();
        let mut seen = Vec::new();
        for rm in &exported {
            for sm in &rm.scope_metrics {
                assert_eq!(sm.scope.name(), "otelnote-test");
                for metric in &sm.metrics {
                    let sum = metric
                        .data
                        .as_any()
                        .downcast_ref::<Sum<u64>>()
                        .expect("observable counter exports a sum");
                    assert!(sum.is_monotonic);
                    let total: u64 = sum.data_points.iter().map(|dp| dp.value).sum();
                    seen.push((metric.name.to_string(), metric.description.to_string(), total));
                }
            }
        }
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("delete_counter".to_string(), "counts delete requests".to_string(), 0),
                ("get_counter".to_string(), "counts get requests".to_string(), 1),
                ("post_counter".to_string(), "counts post requests".to_string(), 2),
                ("put_counter".to_string(), "counts put requests".to_string(), 0),
            ]
        );

        tokio::task::spawn_blocking(move || provider.shutdown()).await.unwrap().unwrap();
    }
}
