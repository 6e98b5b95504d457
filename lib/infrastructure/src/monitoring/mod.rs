pub mod meter;

use anyhow::Context as _;
use opentelemetry::trace::TracerProvider;
use opentelemetry::KeyValue;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{ExporterBuildError, WithExportConfig};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use std::error::Error;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitoringConfig {
    pub service_name: String,
    #[serde(default)]
    pub logs: EnvFilterConfig,
    #[serde(default)]
    pub traces: EnvFilterConfig,
    #[serde(default)]
    pub json: bool,
    pub otlp: Option<OtlpConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct EnvFilterConfig {
    pub default_level: String,
    #[serde(default)]
    pub filters: Vec<String>,
}

impl Default for EnvFilterConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_owned(),
            filters: vec![],
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OtlpConfig {
    pub url: String,
}

impl TryFrom<&EnvFilterConfig> for EnvFilter {
    type Error = anyhow::Error;

    //default level stays in effect next to the per-target filters
    fn try_from(config: &EnvFilterConfig) -> Result<Self, Self::Error> {
        let level: LevelFilter = config
            .default_level
            .parse()
            .with_context(|| format!("Invalid default log level {}", config.default_level))?;

        let directives = std::iter::once(level.to_string())
            .chain(config.filters.iter().cloned())
            .collect::<Vec<_>>()
            .join(",");

        EnvFilter::builder()
            .parse(&directives)
            .with_context(|| format!("Invalid log filter {}", directives))
    }
}

impl MonitoringConfig {
    pub fn init(&self) -> Result<(), Box<dyn Error>> {
        let fmt_filter = EnvFilter::try_from(&self.logs)?;
        let fmt_layer = if self.json {
            tracing_subscriber::fmt::layer().json().with_filter(fmt_filter).boxed()
        } else {
            tracing_subscriber::fmt::layer().with_filter(fmt_filter).boxed()
        };

        let Some(otlp) = &self.otlp else {
            tracing_subscriber::registry().with(fmt_layer).init();
            return Ok(());
        };

        let resource = Resource::builder()
            .with_attribute(KeyValue::new("service.name", self.service_name.clone()))
            .build();

        opentelemetry::global::set_text_map_propagator(TraceContextPropagator::default());

        let logger_provider = init_logs(resource.clone(), &otlp.url)?;
        let logging_layer =
            OpenTelemetryTracingBridge::new(&logger_provider).with_filter(EnvFilter::try_from(&self.logs)?);

        let tracer_provider = init_traces(resource.clone(), &otlp.url)?;
        let tracer = tracer_provider.tracer(self.service_name.clone());
        let tracing_layer = OpenTelemetryLayer::new(tracer).with_filter(EnvFilter::try_from(&self.traces)?);

        opentelemetry::global::set_meter_provider(init_metrics(resource, &otlp.url)?);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(logging_layer)
            .with(tracing_layer)
            .init();

        Ok(())
    }
}

fn init_traces(resource: Resource, url: &str) -> Result<SdkTracerProvider, ExporterBuildError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(url)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}

fn init_metrics(resource: Resource, url: &str) -> Result<SdkMeterProvider, ExporterBuildError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(url)
        .build()?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(std::time::Duration::from_secs(30))
        .build();

    Ok(SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build())
}

fn init_logs(resource: Resource, url: &str) -> Result<SdkLoggerProvider, ExporterBuildError> {
    let exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(url)
        .build()?;

    Ok(SdkLoggerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}
