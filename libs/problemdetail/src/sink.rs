//! Destination of problem log records.

use std::error::Error;

use http::StatusCode;
use tracing::Level;

/// Target of every event emitted by [`TracingSink`].
pub const LOG_TARGET: &str = "problemdetail";

/// A resolved log line. Never carries the `Auto` pseudo level.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub channel: &'a str,
    pub level: Level,
    pub status: StatusCode,
    pub message: &'a str,
    /// The error, attached when the level asks for its cause chain.
    pub error: Option<&'a (dyn Error + 'static)>,
}

/// Receives log records for problem occurrences.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord<'_>);
}

/// Forwards records to the current `tracing` dispatcher.
///
/// `tracing` targets are static, so the channel is recorded in the `logger` field
/// next to the numeric `status`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! emit_at {
    ($level:expr, $record:expr) => {
        match $record.error {
            Some(error) => tracing::event!(
                target: LOG_TARGET,
                $level,
                logger = $record.channel,
                status = $record.status.as_u16(),
                error = error,
                "{}",
                $record.message
            ),
            None => tracing::event!(
                target: LOG_TARGET,
                $level,
                logger = $record.channel,
                status = $record.status.as_u16(),
                "{}",
                $record.message
            ),
        }
    };
}

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord<'_>) {
        // event levels must be constants
        if record.level == Level::ERROR {
            emit_at!(Level::ERROR, record);
        } else if record.level == Level::WARN {
            emit_at!(Level::WARN, record);
        } else if record.level == Level::INFO {
            emit_at!(Level::INFO, record);
        } else {
            emit_at!(Level::DEBUG, record);
        }
    }
}
