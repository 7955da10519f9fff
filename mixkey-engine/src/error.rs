//! Error types for the detection & fusion engine
//!
//! Every variant is fatal only to its own analysis path. The orchestrator
//! converts each failure into "this path produced no data" before fusion,
//! so no error ever propagates out of `analyze()`.

use thiserror::Error;

/// Engine error taxonomy
#[derive(Debug, Error)]
pub enum EngineError {
    /// Audio could not be decoded (fatal to the native path only)
    #[error("Decode failure: {0}")]
    Decode(String),

    /// Chromagram or rhythm extractor failed (fatal to the native path only)
    #[error("Extraction failure: {0}")]
    Extraction(String),

    /// A single lookup source failed (fatal to that source only)
    #[error("Lookup failure: {0}")]
    Lookup(String),

    /// mixkey-common error
    #[error("Common error: {0}")]
    Common(#[from] mixkey_common::Error),
}
