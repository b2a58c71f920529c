//! Crate-wide limits and reserved names.

/// Maximum nesting depth accepted for a JSON value.
///
/// `serde_json::Value` is acyclic by construction, so depth is the one
/// structural hazard the conversion layer has to bound: both the shape
/// validator and the engine adapter recurse over the value tree. The two
/// share this constant so their rejection thresholds agree.
pub const MAX_JSON_DEPTH: usize = 1024;

/// Reserved root key under which an encoded JSON value is stored.
///
/// The engine's document root is a mapping; hosting the value under a
/// single well-known key lets scalar and array roots round-trip through it.
pub const DOC_ROOT_KEY: &str = "root";
