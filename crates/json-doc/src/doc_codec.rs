//! Document codec — the boundary between plain JSON and binary documents.
//!
//! `encode` seeds a fresh engine document from a JSON value and serializes
//! it to opaque bytes; `decode` loads a binary document and returns its
//! JSON view. Both are stateless and pure with respect to their inputs, so
//! independent invocations can run in parallel without coordination.
//!
//! Round-trip law: for any `value` accepted by `encode` with options `o`,
//! `decode(encode(value, o), o)` is structurally equal to `value` — deep,
//! order-sensitive for sequences, order-insensitive for mapping keys.

use serde_json::Value;
use tracing::debug;

use crate::engine::{AutomergeEngine, CrdtEngine, EngineError};
use crate::json_shape;

// ── Options ───────────────────────────────────────────────────────────────

/// Options threaded through `encode` and `decode`.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Opaque identity token for the edit origin of the document. Format
    /// constraints belong to the engine (hex for the automerge engine).
    pub actor: Option<String>,
    /// Run shape validation before encoding. Off by default: unvalidated
    /// values go straight to the engine and its own acceptance rules apply.
    pub validate_json: bool,
}

// ── Errors ────────────────────────────────────────────────────────────────

/// Conversion failure kinds.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Input failed shape validation (only raised when validation was
    /// requested).
    #[error("invalid JSON value: {0}")]
    Validation(String),
    /// The engine rejected the value or the actor token while encoding.
    #[error("encode failed: {0}")]
    Encode(#[source] EngineError),
    /// The bytes are empty, truncated, or not a recognizable document.
    #[error("decode failed: {0}")]
    Decode(#[source] EngineError),
    /// Propagated verbatim from the persistence boundary.
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
}

// ── Codec ─────────────────────────────────────────────────────────────────

/// JSON ⇄ binary document codec over a CRDT engine.
pub struct DocumentCodec<E = AutomergeEngine> {
    engine: E,
}

impl DocumentCodec {
    /// Codec over the default automerge engine.
    pub fn new() -> Self {
        Self { engine: AutomergeEngine::new() }
    }
}

impl Default for DocumentCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CrdtEngine> DocumentCodec<E> {
    /// Codec over a caller-supplied engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Encode `value` into an opaque binary document.
    ///
    /// With `options.validate_json` set, the value is shape-checked first
    /// and rejected with [`ConvertError::Validation`] before any engine
    /// call. Engine failures surface unmasked as [`ConvertError::Encode`].
    pub fn encode(
        &self,
        value: &Value,
        options: &ConversionOptions,
    ) -> Result<Vec<u8>, ConvertError> {
        if options.validate_json {
            json_shape::validate(value).map_err(|e| ConvertError::Validation(e.to_string()))?;
        }
        let mut doc = self
            .engine
            .create(value, options.actor.as_deref())
            .map_err(ConvertError::Encode)?;
        let bytes = self.engine.serialize(&mut doc);
        debug!(len = bytes.len(), actor = options.actor.is_some(), "encoded value");
        Ok(bytes)
    }

    /// Decode an opaque binary document back into its JSON view.
    ///
    /// The detection boundary for unrecognizable input is the engine's own;
    /// its verdict is forwarded as [`ConvertError::Decode`].
    pub fn decode(&self, bytes: &[u8], options: &ConversionOptions) -> Result<Value, ConvertError> {
        let doc = self
            .engine
            .deserialize(bytes, options.actor.as_deref())
            .map_err(ConvertError::Decode)?;
        let value = self.engine.materialize(&doc).map_err(ConvertError::Decode)?;
        debug!(len = bytes.len(), "decoded document");
        Ok(value)
    }

    /// Probe untrusted bytes: true iff the engine can materialize *some*
    /// document from them — not that this crate produced them.
    ///
    /// Boolean projection of [`Self::decode`]'s `Result`; never panics and
    /// never propagates the failure.
    pub fn is_valid_binary(&self, bytes: &[u8]) -> bool {
        self.decode(bytes, &ConversionOptions::default()).is_ok()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    /// Engine stand-in that keeps the view as JSON text bytes and counts
    /// `create` calls, so gating order is observable.
    #[derive(Default)]
    struct MockEngine {
        creates: Cell<usize>,
    }

    impl CrdtEngine for MockEngine {
        type Doc = Value;

        fn create(&self, value: &Value, actor: Option<&str>) -> Result<Value, EngineError> {
            self.creates.set(self.creates.get() + 1);
            if let Some(actor) = actor {
                if actor.contains(' ') {
                    return Err(EngineError::InvalidActor(actor.to_string()));
                }
            }
            Ok(value.clone())
        }

        fn serialize(&self, doc: &mut Value) -> Vec<u8> {
            doc.to_string().into_bytes()
        }

        fn deserialize(&self, bytes: &[u8], _actor: Option<&str>) -> Result<Value, EngineError> {
            serde_json::from_slice(bytes).map_err(|e| EngineError::Corrupt(e.to_string()))
        }

        fn materialize(&self, doc: &Value) -> Result<Value, EngineError> {
            Ok(doc.clone())
        }
    }

    fn deep_value(depth: usize) -> Value {
        let mut value = json!(null);
        for _ in 0..depth {
            value = json!([value]);
        }
        value
    }

    #[test]
    fn roundtrips_through_the_engine() {
        let codec = DocumentCodec::with_engine(MockEngine::default());
        let value = json!({ "a": [1, 2], "b": null });
        let options = ConversionOptions::default();
        let bytes = codec.encode(&value, &options).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(codec.decode(&bytes, &options).unwrap(), value);
    }

    #[test]
    fn validation_failure_precedes_any_engine_call() {
        let codec = DocumentCodec::with_engine(MockEngine::default());
        let options = ConversionOptions { actor: None, validate_json: true };
        let err = codec.encode(&deep_value(2000), &options).unwrap_err();
        assert!(matches!(err, ConvertError::Validation(_)));
        assert_eq!(codec.engine.creates.get(), 0);
    }

    #[test]
    fn unvalidated_values_reach_the_engine() {
        let codec = DocumentCodec::with_engine(MockEngine::default());
        let options = ConversionOptions::default();
        codec.encode(&json!({ "ok": true }), &options).unwrap();
        assert_eq!(codec.engine.creates.get(), 1);
    }

    #[test]
    fn engine_rejections_surface_as_encode_errors() {
        let codec = DocumentCodec::with_engine(MockEngine::default());
        let options = ConversionOptions {
            actor: Some("bad actor".to_string()),
            validate_json: false,
        };
        let err = codec.encode(&json!(1), &options).unwrap_err();
        assert!(matches!(err, ConvertError::Encode(EngineError::InvalidActor(_))));
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let codec = DocumentCodec::with_engine(MockEngine::default());
        let err = codec
            .decode(b"not json", &ConversionOptions::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }

    #[test]
    fn probe_is_a_boolean_projection_of_decode() {
        let codec = DocumentCodec::with_engine(MockEngine::default());
        let bytes = codec
            .encode(&json!({ "x": 1 }), &ConversionOptions::default())
            .unwrap();
        assert!(codec.is_valid_binary(&bytes));
        assert!(!codec.is_valid_binary(b""));
        assert!(!codec.is_valid_binary(&[1, 2, 3, 4, 5]));
        // Probing is idempotent and side-effect free on the bytes.
        assert!(!codec.is_valid_binary(&[1, 2, 3, 4, 5]));
        assert!(codec.is_valid_binary(&bytes));
    }
}
