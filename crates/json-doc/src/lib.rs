//! json-doc — conversion between plain JSON and CRDT binary documents.
//!
//! The crate sits at the boundary of a CRDT engine: it shape-checks JSON
//! input before encoding (`json_shape`), seeds engine documents and
//! serializes them to opaque bytes (`doc_codec` over the `engine`
//! contract), probes untrusted binary input without propagating engine
//! failures, and exposes the whole pipeline through the `json-to-binary`
//! and `binary-to-json` binaries.

pub mod constants;
pub mod doc_codec;
pub mod doc_store;
pub mod engine;
pub mod json_cli;
pub mod json_shape;
