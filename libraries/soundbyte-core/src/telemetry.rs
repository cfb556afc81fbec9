//! Fire-and-forget usage telemetry.

use tracing::debug;

/// Sink for usage events.
///
/// Implementations must never fail the caller: the signature has no error
/// path, and anything that goes wrong inside is dropped.
pub trait Telemetry: Send + Sync {
    fn track_event(&self, name: &str, properties: &[(&str, String)]);
}

/// Telemetry that only writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn track_event(&self, name: &str, properties: &[(&str, String)]) {
        debug!(event = %name, properties = ?properties, "Telemetry event");
    }
}
