//! Command-line conversion logic.
//!
//! Core logic behind the two binary entry points:
//! - `json-to-binary` — JSON text → binary document
//! - `binary-to-json` — binary document → pretty-printed JSON text
//!
//! The binaries stay thin: argument and stream plumbing lives there,
//! everything else here, so the conversions are testable without spawning
//! processes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;

use crate::doc_codec::{ConversionOptions, ConvertError, DocumentCodec};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Convert(#[from] ConvertError),
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("compatibility check failed: round-tripped value differs from the original")]
    CheckFailed,
}

// ── json-to-binary ────────────────────────────────────────────────────────

/// Convert JSON text to a binary document.
///
/// With `check` set, the produced bytes are decoded again and compared
/// against the parsed input; a mismatch is [`CliError::CheckFailed`].
pub fn json_to_binary(
    json: &str,
    options: &ConversionOptions,
    check: bool,
) -> Result<Vec<u8>, CliError> {
    let value: Value = serde_json::from_str(json)?;
    let codec = DocumentCodec::new();
    let bytes = codec.encode(&value, options)?;
    if check {
        let roundtrip = codec.decode(&bytes, options)?;
        if roundtrip != value {
            return Err(CliError::CheckFailed);
        }
    }
    Ok(bytes)
}

// ── binary-to-json ────────────────────────────────────────────────────────

/// Convert a binary document to pretty-printed JSON text.
///
/// With `check` set, the decoded value is encoded and decoded once more
/// and compared against itself, proving the view is re-encodable.
pub fn binary_to_json(
    bytes: &[u8],
    options: &ConversionOptions,
    check: bool,
) -> Result<String, CliError> {
    let codec = DocumentCodec::new();
    let value = codec.decode(bytes, options)?;
    if check {
        let reencoded = codec.encode(&value, options)?;
        let roundtrip = codec.decode(&reencoded, options)?;
        if roundtrip != value {
            return Err(CliError::CheckFailed);
        }
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

// ── Text-safe byte transport ──────────────────────────────────────────────

/// Encode document bytes as base64 text for pipe-safe output.
pub fn to_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode base64 text (as produced by `--base64` output) back into bytes.
pub fn from_base64(text: &str) -> Result<Vec<u8>, CliError> {
    Ok(BASE64.decode(text.trim().as_bytes())?)
}

// ── Logging ───────────────────────────────────────────────────────────────

/// Install the stderr logging subscriber used by the binaries.
///
/// The filter comes from `RUST_LOG` (default `warn`); stdout stays clean
/// for payload bytes.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Tests ─────────────────────────────────────────────────────────────────
