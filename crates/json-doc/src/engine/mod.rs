//! External CRDT engine contract.
//!
//! The codec consumes the engine through this trait alone: seed a fresh
//! document from a JSON value, serialize it to opaque bytes, load a
//! document back from bytes, and materialize its JSON view. `serialize`
//! and `deserialize` are exact inverses for any document the engine itself
//! produced. The trait keeps the engine swappable — the shipped
//! implementation is [`AutomergeEngine`], tests substitute their own.

pub mod automerge;

pub use self::automerge::AutomergeEngine;

use serde_json::Value;

// ── Errors ────────────────────────────────────────────────────────────────

/// Failure raised by an engine operation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The actor identity token does not satisfy the engine's format rules.
    #[error("invalid actor id: {0:?}")]
    InvalidActor(String),
    /// The value cannot be represented as an engine document.
    #[error("value not representable: {0}")]
    Unrepresentable(String),
    /// The bytes are not a recognizable document encoding.
    #[error("unrecognizable document: {0}")]
    Corrupt(String),
    /// Internal engine failure while building or reading a document.
    #[error("engine failure: {0}")]
    Internal(#[from] ::automerge::AutomergeError),
}

// ── Contract ──────────────────────────────────────────────────────────────

/// Contract between the conversion core and the CRDT engine.
pub trait CrdtEngine {
    /// The engine's in-memory document representation.
    type Doc;

    /// Materialize a fresh document seeded with `value`, attributing its
    /// initial state to `actor` when supplied.
    fn create(&self, value: &Value, actor: Option<&str>) -> Result<Self::Doc, EngineError>;

    /// Serialize a document to its opaque binary form.
    fn serialize(&self, doc: &mut Self::Doc) -> Vec<u8>;

    /// Load a document from its binary form, optionally associating
    /// `actor` with subsequent edits.
    fn deserialize(&self, bytes: &[u8], actor: Option<&str>) -> Result<Self::Doc, EngineError>;

    /// Return the JSON view of the document.
    fn materialize(&self, doc: &Self::Doc) -> Result<Value, EngineError>;
}
