//! # Logging & Tracing Infrastructure
//!
//! Configures `tracing-subscriber` for the playback core:
//! - JSON, pretty and compact output formats
//! - Per-crate filtering with an `EnvFilter` override
//! - Mirroring of events into a host [`LoggerSink`]
//! - Helpers that keep media locations and credentials out of logs
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::logger::{ConsoleLogger, LogLevel};
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use std::sync::Arc;
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_level(LogLevel::Debug)
//!     .with_logger_sink(Arc::new(ConsoleLogger::default()));
//!
//! init_logging(config)?;
//! tracing::info!("player host started");
//! ```
//!
//! ## LoggerSink integration
//!
//! When a sink is configured every event that survives filtering is converted
//! into a [`LogEntry`] (message, fields, enclosing span name) and handed to
//! the sink. Entries are queued to a dedicated `logger-sink` thread that runs
//! its own Tokio runtime, so logging never waits on the sink and the sink may
//! use Tokio timers and I/O. Entries reach the sink in emission order.

use crate::error::{Error, Result};

use bridge_traits::logger::{LogEntry, LogLevel, LoggerSink};
use bridge_traits::playback::MediaSource;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Crates whose level follows [`LoggingConfig::level`] when no custom filter
/// is given.
const WORKSPACE_TARGETS: &[&str] = &[
    "vpc_workspace",
    "core_runtime",
    "core_playback",
    "bridge_traits",
    "bridge_desktop",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Minimum level for workspace crates
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_playback=trace,bridge_desktop=debug")
    pub filter: Option<String>,
    /// Optional logger sink for forwarding logs to host
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Emit span enter/exit context (session spans carry the session id)
    pub enable_spans: bool,
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            enable_spans: true,
            display_target: true,
            // Engine callbacks arrive on arbitrary threads, so this is useful
            // when chasing marshaling issues.
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Install the global tracing subscriber.
///
/// Call once during host startup.
///
/// # Errors
///
/// [`Error::Config`] when the filter string is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let sink_layer = LoggerSinkLayer::new(config.logger_sink.clone());
    let registry = tracing_subscriber::registry().with(filter).with(sink_layer);

    let result = match config.format {
        LogFormat::Pretty => {
            let span_events = if config.enable_spans {
                tracing_subscriber::fmt::format::FmtSpan::ACTIVE
            } else {
                tracing_subscriber::fmt::format::FmtSpan::NONE
            };
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_target(config.display_target)
                        .with_thread_ids(config.display_thread_info)
                        .with_thread_names(config.display_thread_info)
                        .with_span_events(span_events)
                        .with_writer(io::stdout),
                )
                .try_init()
        }
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(config.enable_spans)
                    .with_span_list(config.enable_spans)
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = match &config.filter {
        Some(custom) => custom.clone(),
        None => {
            let level = level_directive(config.level);
            let mut directives: Vec<String> = WORKSPACE_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, level))
                .collect();
            directives.insert(0, "warn".to_string());
            directives.join(",")
        }
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

const SINK_THREAD_NAME: &str = "logger-sink";

/// Layer that forwards events to a `LoggerSink` implementation.
struct LoggerSinkLayer {
    forwarder: Option<SinkForwarder>,
}

impl LoggerSinkLayer {
    fn new(sink: Option<Arc<dyn LoggerSink>>) -> Self {
        Self {
            forwarder: sink.and_then(SinkForwarder::spawn),
        }
    }
}

/// Queue feeding a sink from its own thread.
///
/// The worker drains the queue until every sender is dropped, then flushes
/// the sink and exits.
struct SinkForwarder {
    min_level: LogLevel,
    sender: mpsc::UnboundedSender<LogEntry>,
}

impl SinkForwarder {
    fn spawn(sink: Arc<dyn LoggerSink>) -> Option<Self> {
        let min_level = sink.min_level();
        let (sender, mut receiver) = mpsc::unbounded_channel::<LogEntry>();

        let worker = thread::Builder::new()
            .name(SINK_THREAD_NAME.to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        eprintln!("LoggerSink runtime unavailable: {}", err);
                        return;
                    }
                };

                runtime.block_on(async move {
                    while let Some(entry) = receiver.recv().await {
                        if let Err(err) = sink.log(entry).await {
                            eprintln!("LoggerSink error: {}", err);
                        }
                    }
                    if let Err(err) = sink.flush().await {
                        eprintln!("LoggerSink flush error: {}", err);
                    }
                });
            });

        match worker {
            Ok(_) => Some(Self { min_level, sender }),
            Err(err) => {
                eprintln!("LoggerSink thread unavailable: {}", err);
                None
            }
        }
    }

    fn forward(&self, entry: LogEntry) {
        // Fails only once the worker has exited
        let _ = self.sender.send(entry);
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(forwarder) = self.forwarder.as_ref() else {
            return;
        };
        // Events raised by the sink itself would loop back into the queue
        if thread::current().name() == Some(SINK_THREAD_NAME) {
            return;
        }

        let metadata = event.metadata();
        let level = tracing_level_to_log_level(*metadata.level());
        if level < forwarder.min_level {
            return;
        }

        let mut visitor = SinkVisitor::default();
        event.record(&mut visitor);

        let message = visitor
            .message
            .unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);
        for (key, value) in visitor.fields {
            entry = entry.with_field(key, value);
        }
        if let Some(span) = ctx.lookup_current() {
            entry = entry.with_span_id(span.name());
        }

        forwarder.forward(entry);
    }
}

#[derive(Default)]
struct SinkVisitor {
    message: Option<String>,
    fields: HashMap<String, String>,
}

impl SinkVisitor {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for SinkVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

fn tracing_level_to_log_level(level: tracing::Level) -> LogLevel {
    match level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

/// Redact a field value when its name marks it as a credential.
///
/// ```ignore
/// use core_runtime::logging::redact_if_sensitive;
///
/// tracing::debug!(authorization = %redact_if_sensitive("authorization", value), "request headers");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    const SENSITIVE_FIELDS: &[&str] = &[
        "token",
        "password",
        "secret",
        "api_key",
        "authorization",
        "bearer",
        "cookie",
        "signature",
    ];

    let field_lower = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|&f| field_lower.contains(f)) {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}

/// Strip a file path to its basename.
///
/// ```ignore
/// use core_runtime::logging::strip_path;
///
/// tracing::info!(file = %strip_path("/Users/jo/Movies/clip.mov"), "opening");
/// // Logs: file="clip.mov"
/// ```
pub fn strip_path(path: &str) -> &str {
    path.rsplit('/')
        .next()
        .unwrap_or(path)
        .rsplit('\\')
        .next()
        .unwrap_or(path)
}

/// Loggable form of a media source.
///
/// Local files keep only their basename. Remote URLs drop the query string
/// and fragment (signed CDN URLs carry tokens there) and any userinfo.
/// Header values are never included.
pub fn describe_source(source: &MediaSource) -> String {
    match source {
        MediaSource::LocalFile { path } => strip_path(&path.to_string_lossy()).to_string(),
        MediaSource::RemoteUrl { url, .. } => {
            let without_query = url.split(['?', '#']).next().unwrap_or(url);
            match without_query.split_once("://") {
                Some((scheme, rest)) => {
                    let (authority, path) = rest.find('/').map_or((rest, ""), |i| rest.split_at(i));
                    let host = authority
                        .rsplit_once('@')
                        .map_or(authority, |(_, host)| host);
                    format!("{}://{}{}", scheme, host, path)
                }
                None => without_query.to_string(),
            }
        }
    }
}
