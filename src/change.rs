//! Server-set change detection.

use serde_json::Value;

use crate::models::ServerRecord;

/// Reports whether the server set differs from the previous one.
///
/// Both lists are serialized independently to `serde_json::Value` and
/// compared field by field. Order is significant. An empty `previous` (no
/// history) makes any non-empty `current` count as changed. If either side
/// cannot be serialized the sets are reported as changed.
pub fn servers_changed(current: &[ServerRecord], previous: &[ServerRecord]) -> bool {
    match (canonical(current), canonical(previous)) {
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}

fn canonical(records: &[ServerRecord]) -> Option<Value> {
    match serde_json::to_value(records) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Failed to serialize server list for comparison: {}", e);
            None
        }
    }
}
