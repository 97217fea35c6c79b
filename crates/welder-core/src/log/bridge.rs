//! Forward `tracing` events into the registry.
//!
//! Components that log through `tracing` macros end up in the same sinks and
//! obey the same per-child levels as components holding a [`Logger`]. Only
//! events whose target lies under the root namespace (or the file-style
//! prefix) are forwarded.
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//!
//! let registry = LoggingRegistry::new(RegistryNames::default());
//! tracing_subscriber::registry()
//!     .with(RegistryLayer::new(registry.clone()))
//!     .init();
//!
//! tracing::info!(target: "arc_welder::preprocessor", "Queued {}", path);
//! ```
//!
//! [`Logger`]: super::Logger

use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;
use welder_types::LogLevel;

use super::registry::LoggingRegistry;

/// Map a `tracing` level onto the registry's levels.
pub fn level_from_tracing(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Verbose,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warning,
        Level::ERROR => LogLevel::Error,
    }
}

/// A tracing Layer that writes events through a [`LoggingRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryLayer {
    registry: LoggingRegistry,
}

impl RegistryLayer {
    /// Forward events into `registry`.
    pub fn new(registry: LoggingRegistry) -> Self {
        Self { registry }
    }

    /// Logger name for an event target, or `None` when the target is outside
    /// the registry's namespace.
    ///
    /// `arc_welder::preprocessor` and `octoprint_arc_welder::preprocessor`
    /// both resolve to the `preprocessor` child; `arc_welder` is the root.
    pub fn logger_name_for(&self, target: &str) -> Option<String> {
        let names = self.registry.names();
        let dotted = target.replace("::", ".");

        if dotted == names.root {
            return Some(dotted);
        }
        if let Some(child) = dotted.strip_prefix(names.entry_prefix.as_str()) {
            return Some(child.to_string());
        }
        if dotted.starts_with(names.file_prefix.as_str()) {
            return Some(dotted);
        }
        None
    }
}

impl<S> Layer<S> for RegistryLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let Some(name) = self.logger_name_for(metadata.target()) else {
            return;
        };

        let logger = self.registry.get_logger(&name);
        let level = level_from_tracing(metadata.level());
        if !logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        logger.log(level, visitor.finish());
    }
}

/// Collects the `message` field and renders the rest as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }
}
