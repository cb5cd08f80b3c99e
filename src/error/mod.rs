//! Error types for the readiness gate.

mod gate_error;

pub use gate_error::GateError;
