//! Event rendering for the command line.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::event::{AddressEvent, ChangeKind};
use crate::monitor::EventSink;

/// How events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `new <index> <address>` / `del <index> <address>` line per event.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// JSON shape of one event.
#[derive(Debug, Serialize)]
struct JsonEvent {
    kind: ChangeKind,
    interface_index: u32,
    address: Option<String>,
}

impl From<&AddressEvent> for JsonEvent {
    fn from(event: &AddressEvent) -> Self {
        Self {
            kind: event.kind(),
            interface_index: event.interface_index(),
            address: event.has_address().then(|| event.address_string()),
        }
    }
}

/// Sink writing each event as one line to `W`.
///
/// Every line is flushed as soon as it is written. A failed write is logged
/// and the event dropped; the watcher keeps running.
#[derive(Debug)]
pub struct EventPrinter<W> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> EventPrinter<W> {
    /// Creates a printer writing `format` lines to `writer`.
    pub const fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    /// The configured format.
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Consumes the printer, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes one event line.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if writing or flushing fails.
    pub fn write_event(&mut self, event: &AddressEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{event}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, &JsonEvent::from(event))?;
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()
    }
}

impl<W: Write> EventSink for EventPrinter<W> {
    fn handle(&mut self, event: AddressEvent) {
        if let Err(e) = self.write_event(&event) {
            tracing::warn!("Failed to write event ({event}): {e}");
        }
    }
}
