//! # Logging and Telemetry
//!
//! Console logging through `tracing-subscriber` is always installed. The level
//! is taken from `RUST_LOG` and defaults to `info`.
//!
//! OpenTelemetry export is opt-in:
//!
//! - `tracing`: exports spans (each RPC handler runs in one).
//! - `metrics`: exports request counters and the listing size histogram.
//! - `stdout`: prints exported spans/metrics to stdout. Requires `tracing` or
//!   `metrics`.
//!
//! Without `metrics` the recording helpers at the bottom of this module are
//! no-ops, so handlers can call them unconditionally.
//!
//! ```bash
//! cargo run --features tracing,metrics,stdout
//! ```

#[cfg(all(feature = "stdout", not(any(feature = "tracing", feature = "metrics"))))]
compile_error!(
    "The 'stdout' feature requires at least one of 'tracing' or 'metrics' to be enabled."
);

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "metrics")]
use opentelemetry::metrics::{Counter, Histogram, Meter};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::metrics as sdkmetrics;
#[cfg(feature = "metrics")]
use std::sync::OnceLock;

#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry::{InstrumentationScope, KeyValue};
#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry_sdk::Resource;
#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry_semantic_conventions as semvcns;

#[cfg(feature = "tracing")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "tracing")]
use opentelemetry_sdk::propagation::TraceContextPropagator;
#[cfg(feature = "tracing")]
use opentelemetry_sdk::trace as sdktrace;

#[cfg(any(feature = "metrics", feature = "tracing"))]
const SERVICE_NAME: &str = "consignment-service";

/// Exporter providers that must be flushed on shutdown.
pub struct TelemetryProviders {
    #[cfg(feature = "tracing")]
    pub tracer_provider: sdktrace::SdkTracerProvider,
    #[cfg(feature = "metrics")]
    pub meter_provider: sdkmetrics::SdkMeterProvider,
}

impl TelemetryProviders {
    /// Flushes and shuts down every enabled provider. Failures are reported on
    /// stderr since the subscriber may already be gone.
    pub fn shutdown(self) {
        #[cfg(feature = "tracing")]
        {
            if let Err(err) = self.tracer_provider.force_flush() {
                eprintln!("Error flushing traces: {:#?}", err);
            }
            if let Err(err) = self.tracer_provider.shutdown() {
                eprintln!("Error shutting down tracer: {:#?}", err);
            }
        }

        #[cfg(feature = "metrics")]
        {
            if let Err(err) = self.meter_provider.force_flush() {
                eprintln!("Error flushing metrics: {:#?}", err);
            }
            if let Err(err) = self.meter_provider.shutdown() {
                eprintln!("Error shutting down meter: {:#?}", err);
            }
        }
    }
}

pub fn init_telemetry() -> anyhow::Result<TelemetryProviders> {
    #[cfg(feature = "tracing")]
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    #[cfg(feature = "tracing")]
    let tracer_provider = init_tracer();

    #[cfg(feature = "metrics")]
    let meter_provider = init_metrics();

    #[cfg(any(feature = "metrics", feature = "tracing"))]
    let scope = InstrumentationScope::builder(SERVICE_NAME)
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_schema_url(semvcns::SCHEMA_URL)
        .build();

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        );

    #[cfg(feature = "tracing")]
    let registry = {
        opentelemetry::global::set_tracer_provider(tracer_provider.clone());
        registry.with(
            tracing_opentelemetry::layer()
                .with_tracer(tracer_provider.tracer_with_scope(scope.clone()))
                .with_error_records_to_exceptions(true),
        )
    };

    #[cfg(feature = "metrics")]
    let registry = {
        opentelemetry::global::set_meter_provider(meter_provider.clone());
        let meter = opentelemetry::global::meter_with_scope(scope);
        init_metric_handles(meter);

        registry.with(tracing_opentelemetry::MetricsLayer::new(
            meter_provider.clone(),
        ))
    };

    registry.try_init()?;

    Ok(TelemetryProviders {
        #[cfg(feature = "tracing")]
        tracer_provider,
        #[cfg(feature = "metrics")]
        meter_provider,
    })
}

#[cfg(any(feature = "metrics", feature = "tracing"))]
fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_schema_url(
            [KeyValue::new(
                semvcns::resource::SERVICE_VERSION,
                env!("CARGO_PKG_VERSION"),
            )],
            semvcns::SCHEMA_URL,
        )
        .build()
}

#[cfg(feature = "metrics")]
fn init_metrics() -> sdkmetrics::SdkMeterProvider {
    let builder = sdkmetrics::SdkMeterProvider::builder().with_resource(resource());

    #[cfg(feature = "stdout")]
    let builder = {
        let exporter = opentelemetry_stdout::MetricExporter::default();
        let reader = sdkmetrics::PeriodicReader::builder(exporter)
            .with_interval(std::time::Duration::from_secs(5))
            .build();

        builder.with_reader(reader)
    };

    builder.build()
}

#[cfg(feature = "tracing")]
fn init_tracer() -> sdktrace::SdkTracerProvider {
    let builder = sdktrace::SdkTracerProvider::builder().with_resource(resource());

    #[cfg(feature = "stdout")]
    let builder = {
        let exporter = opentelemetry_stdout::SpanExporter::default();
        let batch = sdktrace::BatchSpanProcessor::builder(exporter)
            .with_batch_config(
                sdktrace::BatchConfigBuilder::default()
                    .with_scheduled_delay(std::time::Duration::from_secs(5))
                    .with_max_queue_size(2048)
                    .build(),
            )
            .build();
        builder.with_span_processor(batch)
    };

    builder.build()
}

#[cfg(feature = "metrics")]
static SUBMISSIONS: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static LIST_REQUESTS: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static REQUEST_ERRORS: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static CONSIGNMENTS_LISTED: OnceLock<Histogram<f64>> = OnceLock::new();

#[cfg(feature = "metrics")]
fn init_metric_handles(meter: Meter) {
    let _ = SUBMISSIONS.set(
        meter
            .u64_counter("consignments_submitted")
            .with_description("Consignments accepted by SubmitConsignment")
            .build(),
    );

    let _ = LIST_REQUESTS.set(
        meter
            .u64_counter("list_requests")
            .with_description("ListConsignments calls served")
            .build(),
    );

    let _ = REQUEST_ERRORS.set(
        meter
            .u64_counter("request_errors")
            .with_description("Calls that failed with a gRPC status")
            .build(),
    );

    let _ = CONSIGNMENTS_LISTED.set(
        meter
            .f64_histogram("consignments_listed")
            .with_description("Consignments returned per ListConsignments call")
            .build(),
    );
}

#[cfg(feature = "metrics")]
pub fn increment_submissions() {
    if let Some(counter) = SUBMISSIONS.get() {
        counter.add(1, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_submissions() {}

#[cfg(feature = "metrics")]
pub fn increment_list_requests() {
    if let Some(counter) = LIST_REQUESTS.get() {
        counter.add(1, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_list_requests() {}

#[cfg(feature = "metrics")]
pub fn increment_request_errors() {
    if let Some(counter) = REQUEST_ERRORS.get() {
        counter.add(1, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_request_errors() {}

#[cfg(feature = "metrics")]
pub fn record_consignments_listed(count: f64) {
    if let Some(histogram) = CONSIGNMENTS_LISTED.get() {
        histogram.record(count, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn record_consignments_listed(_count: f64) {}
