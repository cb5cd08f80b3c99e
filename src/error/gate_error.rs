//! Gate-level error types.
//!
//! Every variant here is recoverable by design: the gate catches these at
//! the boundary where they occur, turns them into a log entry, and keeps
//! going (or reaches a terminal outcome). None of them is allowed to take
//! down the embedder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Settings storage denied: {0}")]
    StorageDenied(String),
    #[error("Handle inspection failed: {0}")]
    HandleInspection(String),
    #[error("Handle present but shape not recognized")]
    UnrecognizedShape,
    #[error("Typesetting runtime not detected within {waited_ms}ms")]
    DetectionTimeout { waited_ms: u64 },
    #[error("Re-render invocation failed: {0}")]
    ReRender(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_error_display() {
        assert_eq!(
            GateError::StorageDenied("blocked".into()).to_string(),
            "Settings storage denied: blocked"
        );
        assert_eq!(
            GateError::HandleInspection("version getter".into()).to_string(),
            "Handle inspection failed: version getter"
        );
        assert_eq!(
            GateError::UnrecognizedShape.to_string(),
            "Handle present but shape not recognized"
        );
        assert_eq!(
            GateError::DetectionTimeout { waited_ms: 10000 }.to_string(),
            "Typesetting runtime not detected within 10000ms"
        );
        assert_eq!(
            GateError::ReRender("queue rejected".into()).to_string(),
            "Re-render invocation failed: queue rejected"
        );
    }
}
