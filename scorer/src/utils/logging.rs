use std::collections::HashMap;
use std::fmt::Debug;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::{LookupSpan, SpanRef};
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Span field shown in its own column by the pretty formatter
const CALL_FIELD: &str = "call_uuid";

/// Wide enough for a generated id without run id
const CALL_COLUMN_WIDTH: usize = 29;

const DEFAULT_FILTER: &str = "scorer=info,scorer_functions=info";

/// Fields recorded on a span and on all of its ancestors.
///
/// Stored in the span extensions by [`FieldCollectorLayer`] so that both
/// formatters can attach the call id to events emitted deep inside a job.
#[derive(Debug, Clone, Default)]
pub struct CustomSpanFields {
    pub raw_fields: HashMap<String, String>,
}

impl Visit for CustomSpanFields {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.raw_fields.insert(field.name().to_string(), unquote(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.raw_fields.insert(field.name().to_string(), value.to_string());
    }
}

pub struct FieldCollectorLayer;

impl<S> Layer<S> for FieldCollectorLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };

        let mut fields = span.parent().and_then(|parent| span_fields(&parent)).unwrap_or_default();
        attrs.record(&mut fields);

        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<CustomSpanFields>() {
            Some(fields) => values.record(fields),
            None => {
                let mut fields = CustomSpanFields::default();
                values.record(&mut fields);
                extensions.insert(fields);
            }
        }
    }
}

/// Message and fields of a single event, shared by both formatters.
#[derive(Default)]
struct EventFields {
    message: String,
    fields: Map<String, Value>,
}

impl EventFields {
    fn from_event(event: &Event<'_>) -> Self {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor
    }

    fn insert(&mut self, field: &Field, value: Value) {
        match (field.name(), value) {
            ("message", Value::String(message)) => self.message = message,
            ("message", other) => self.message = other.to_string(),
            (name, value) => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }

    /// Adds span fields an event did not set itself.
    fn inherit(&mut self, span_fields: Option<&CustomSpanFields>) {
        for (key, value) in span_fields.into_iter().flat_map(|f| f.raw_fields.iter()) {
            self.fields.entry(key.clone()).or_insert_with(|| Value::String(value.clone()));
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.insert(field, Value::String(unquote(format!("{:?}", value))));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

fn unquote(formatted: String) -> String {
    formatted.trim_matches('"').to_string()
}

fn span_fields<S>(span: &SpanRef<'_, S>) -> Option<CustomSpanFields>
where
    S: Subscriber + for<'l> LookupSpan<'l>,
{
    span.extensions().get::<CustomSpanFields>().cloned()
}

mod ansi {
    pub const TIMESTAMP: &str = "\x1b[96m";
    pub const CALL: &str = "\x1b[92m";
    pub const MESSAGE: &str = "\x1b[97m";
    pub const DIM: &str = "\x1b[90m";
    pub const RESET: &str = "\x1b[0m";

    pub fn level(level: &tracing::Level) -> &'static str {
        match *level {
            tracing::Level::TRACE => DIM,
            tracing::Level::DEBUG => "\x1b[34m",
            tracing::Level::INFO => "\x1b[32m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::ERROR => "\x1b[31m",
        }
    }
}

/// Console formatter, one aligned line per event:
/// `timestamp | level | call id | service | message (fields)`
pub struct PrettyFormatter;

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let mut event_fields = EventFields::from_event(event);

        let call = match event_fields.fields.remove(CALL_FIELD) {
            Some(Value::String(call)) => call,
            Some(other) => other.to_string(),
            None => ctx
                .lookup_current()
                .and_then(|span| span_fields(&span))
                .and_then(|fields| fields.raw_fields.get(CALL_FIELD).cloned())
                .unwrap_or_else(|| "-".to_string()),
        };
        let separator = format!("{}|{}", ansi::DIM, ansi::RESET);

        write!(
            writer,
            "{}{}{} {sep} {}{:<5}{} {sep} {}{:<width$}{} {sep} {}{:<9}{} {sep} {}{}{}",
            ansi::TIMESTAMP,
            Utc::now().format("%y-%m-%d %H:%M:%S"),
            ansi::RESET,
            ansi::level(meta.level()),
            meta.level(),
            ansi::RESET,
            ansi::CALL,
            call,
            ansi::RESET,
            ansi::CALL,
            extract_service_name(meta.target()),
            ansi::RESET,
            ansi::MESSAGE,
            event_fields.message,
            ansi::RESET,
            sep = separator,
            width = CALL_COLUMN_WIDTH,
        )?;

        if !event_fields.fields.is_empty() {
            let rendered: Vec<String> = event_fields
                .fields
                .iter()
                .map(|(name, value)| match value {
                    Value::String(s) => format!("{}{}={}{}", ansi::DIM, name, s, ansi::RESET),
                    other => format!("{}{}={}{}", ansi::DIM, name, other, ansi::RESET),
                })
                .collect();
            write!(writer, " ({})", rendered.join(", "))?;
        }

        writeln!(writer)
    }
}

/// Structured formatter, one JSON object per line.
pub struct JsonEventFormatter;

impl<S, N> FormatEvent<S, N> for JsonEventFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let mut event_fields = EventFields::from_event(event);

        if let Some(span) = ctx.lookup_current() {
            event_fields.inherit(span_fields(&span).as_ref());
            event_fields
                .fields
                .entry("span_name")
                .or_insert_with(|| Value::String(span.metadata().name().to_string()));
        }

        let mut root = Map::new();
        root.insert("timestamp".into(), Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true).into());
        root.insert("level".into(), meta.level().to_string().into());
        root.insert("target".into(), meta.target().into());
        root.insert("service".into(), extract_service_name(meta.target()).into());
        if let Some(file) = meta.file() {
            root.insert("filename".into(), file.into());
        }
        if let Some(line) = meta.line() {
            root.insert("line_number".into(), line.into());
        }
        root.insert("message".into(), event_fields.message.into());
        if !event_fields.fields.is_empty() {
            root.insert("fields".into(), Value::Object(event_fields.fields));
        }

        let line = serde_json::to_string(&root).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

/// Installs color_eyre and the global tracing subscriber.
///
/// `RUST_LOG` drives filtering (default `scorer=info,scorer_functions=info`),
/// `LOG_FORMAT=json` switches from the pretty console format to JSON lines.
pub fn init_logging() {
    color_eyre::install().expect("Unable to install color_eyre");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(Level::INFO.into())
            .parse(DEFAULT_FILTER)
            .expect("Invalid default log filter")
    });

    let json = std::env::var("LOG_FORMAT").map(|format| format.eq_ignore_ascii_case("json")).unwrap_or(false);
    let fmt_layer = fmt::layer().with_file(true).with_line_number(true);

    let subscriber = Registry::default().with(env_filter).with(FieldCollectorLayer).with(ErrorLayer::default());
    let result = if json {
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer.event_format(JsonEventFormatter)))
    } else {
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer.event_format(PrettyFormatter)))
    };
    result.expect("Failed to set global default subscriber");
}

/// Short display name of the part of the service that emitted an event
fn extract_service_name(target: &str) -> &'static str {
    match target.split("::").collect::<Vec<_>>().as_slice() {
        ["scorer_functions", ..] => "FUNCTIONS",
        ["scorer", "server", ..] => "SERVER",
        ["scorer", "worker", ..] => "WORKER",
        ["scorer", ..] => "-",
        _ => "EXTERNAL",
    }
}
