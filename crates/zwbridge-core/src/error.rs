// ── Core error types ──
//
// `ControllerError` is what a `Manager` implementation reports back to
// the bridge. `BridgeError` is what hosts see from lifecycle calls and
// the command surface. Lookup misses are not errors: they resolve to
// `CommandResult::Ignored`.

use thiserror::Error;

use crate::model::ValueType;

/// Failures reported by the underlying controller library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("Manager options are locked; configure() may only be called once")]
    OptionsLocked,

    #[error("No driver attached for {device}")]
    NoDriver { device: String },

    #[error("Unknown value: {value_id}")]
    UnknownValue { value_id: String },

    #[error("Value {value_id} is not of type {expected}")]
    TypeMismatch {
        value_id: String,
        expected: ValueType,
    },

    #[error("Unknown node: {node_id}")]
    UnknownNode { node_id: u8 },

    #[error("Unknown scene: {scene_id}")]
    UnknownScene { scene_id: u8 },

    #[error("Operation rejected by controller: {message}")]
    Rejected { message: String },
}

/// Unified error type for the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Bridge is already connected to {device}")]
    AlreadyConnected { device: String },

    #[error("Bridge is not connected")]
    NotConnected,

    #[error("Bridge event loop has shut down")]
    Closed,

    // ── Controller errors ────────────────────────────────────────────
    #[error(transparent)]
    Controller(#[from] ControllerError),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}
