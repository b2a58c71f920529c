//! Automerge-backed implementation of the engine contract.
//!
//! Documents are [`automerge::AutoCommit`]. Automerge's document root is a
//! mapping, so the encoded JSON value lives under the reserved
//! [`DOC_ROOT_KEY`] entry; scalar and array roots survive the round trip
//! unchanged that way. Materialization unwraps the reserved entry iff it
//! is the only one at the root — foreign and empty documents still view as
//! their plain root map.
//!
//! Foreign scalar kinds this crate never writes materialize
//! deterministically: counters and timestamps as integers, byte strings as
//! base64 text, text objects as strings, unknown scalars as null.

use automerge::transaction::Transactable;
use automerge::{
    ActorId, AutoCommit, ObjId, ObjType, ReadDoc, ScalarValue, Value as AmValue, ROOT,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::{CrdtEngine, EngineError};
use crate::constants::{DOC_ROOT_KEY, MAX_JSON_DEPTH};

/// CRDT engine backed by the `automerge` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomergeEngine;

impl AutomergeEngine {
    pub fn new() -> Self {
        AutomergeEngine
    }
}

impl CrdtEngine for AutomergeEngine {
    type Doc = AutoCommit;

    fn create(&self, value: &Value, actor: Option<&str>) -> Result<AutoCommit, EngineError> {
        let mut doc = AutoCommit::new();
        if let Some(actor) = actor {
            doc.set_actor(parse_actor(actor)?);
        }
        put_value(&mut doc, &ROOT, DOC_ROOT_KEY, value, 0)?;
        Ok(doc)
    }

    fn serialize(&self, doc: &mut AutoCommit) -> Vec<u8> {
        let bytes = doc.save();
        debug!(len = bytes.len(), "serialized document");
        bytes
    }

    fn deserialize(&self, bytes: &[u8], actor: Option<&str>) -> Result<AutoCommit, EngineError> {
        let mut doc =
            AutoCommit::load(bytes).map_err(|e| EngineError::Corrupt(e.to_string()))?;
        if let Some(actor) = actor {
            doc.set_actor(parse_actor(actor)?);
        }
        Ok(doc)
    }

    fn materialize(&self, doc: &AutoCommit) -> Result<Value, EngineError> {
        let keys: Vec<String> = doc.keys(&ROOT).collect();
        if keys.len() == 1 && keys[0] == DOC_ROOT_KEY {
            read_prop(doc, &ROOT, DOC_ROOT_KEY)
        } else {
            read_map(doc, &ROOT)
        }
    }
}

fn parse_actor(actor: &str) -> Result<ActorId, EngineError> {
    ActorId::try_from(actor).map_err(|_| EngineError::InvalidActor(actor.to_string()))
}

// ── JSON value → document ─────────────────────────────────────────────────

fn put_value(
    doc: &mut AutoCommit,
    obj: &ObjId,
    key: &str,
    value: &Value,
    depth: usize,
) -> Result<(), EngineError> {
    if depth > MAX_JSON_DEPTH {
        return Err(EngineError::Unrepresentable(format!(
            "nesting exceeds {MAX_JSON_DEPTH} levels"
        )));
    }
    match value {
        Value::Object(map) => {
            let child = doc.put_object(obj, key, ObjType::Map)?;
            put_map(doc, &child, map, depth + 1)
        }
        Value::Array(items) => {
            let child = doc.put_object(obj, key, ObjType::List)?;
            put_list(doc, &child, items, depth + 1)
        }
        leaf => {
            doc.put(obj, key, to_scalar(leaf)?)?;
            Ok(())
        }
    }
}

fn insert_value(
    doc: &mut AutoCommit,
    obj: &ObjId,
    index: usize,
    value: &Value,
    depth: usize,
) -> Result<(), EngineError> {
    if depth > MAX_JSON_DEPTH {
        return Err(EngineError::Unrepresentable(format!(
            "nesting exceeds {MAX_JSON_DEPTH} levels"
        )));
    }
    match value {
        Value::Object(map) => {
            let child = doc.insert_object(obj, index, ObjType::Map)?;
            put_map(doc, &child, map, depth + 1)
        }
        Value::Array(items) => {
            let child = doc.insert_object(obj, index, ObjType::List)?;
            put_list(doc, &child, items, depth + 1)
        }
        leaf => {
            doc.insert(obj, index, to_scalar(leaf)?)?;
            Ok(())
        }
    }
}

fn put_map(
    doc: &mut AutoCommit,
    obj: &ObjId,
    map: &Map<String, Value>,
    depth: usize,
) -> Result<(), EngineError> {
    for (key, value) in map {
        put_value(doc, obj, key, value, depth)?;
    }
    Ok(())
}

fn put_list(
    doc: &mut AutoCommit,
    obj: &ObjId,
    items: &[Value],
    depth: usize,
) -> Result<(), EngineError> {
    for (index, item) in items.iter().enumerate() {
        insert_value(doc, obj, index, item, depth)?;
    }
    Ok(())
}

fn to_scalar(value: &Value) -> Result<ScalarValue, EngineError> {
    match value {
        Value::Null => Ok(ScalarValue::Null),
        Value::Bool(b) => Ok(ScalarValue::Boolean(*b)),
        Value::Number(n) => number_to_scalar(n),
        Value::String(s) => Ok(ScalarValue::Str(s.as_str().into())),
        Value::Array(_) | Value::Object(_) => Err(EngineError::Unrepresentable(
            "container where a scalar was expected".to_string(),
        )),
    }
}

fn number_to_scalar(n: &Number) -> Result<ScalarValue, EngineError> {
    if let Some(i) = n.as_i64() {
        Ok(ScalarValue::Int(i))
    } else if let Some(u) = n.as_u64() {
        Ok(ScalarValue::Uint(u))
    } else if let Some(f) = n.as_f64() {
        Ok(ScalarValue::F64(f))
    } else {
        Err(EngineError::Unrepresentable(format!(
            "number {n} has no engine scalar form"
        )))
    }
}

// ── Document → JSON value ─────────────────────────────────────────────────

fn read_prop(doc: &AutoCommit, obj: &ObjId, key: &str) -> Result<Value, EngineError> {
    match doc.get(obj, key)? {
        Some((value, id)) => read_value(doc, &value, &id),
        None => Ok(Value::Null),
    }
}

fn read_value(doc: &AutoCommit, value: &AmValue<'_>, id: &ObjId) -> Result<Value, EngineError> {
    match value {
        AmValue::Object(ObjType::Map) | AmValue::Object(ObjType::Table) => read_map(doc, id),
        AmValue::Object(ObjType::List) => read_list(doc, id),
        AmValue::Object(ObjType::Text) => Ok(Value::String(doc.text(id)?)),
        AmValue::Scalar(scalar) => scalar_to_json(scalar),
    }
}

fn read_map(doc: &AutoCommit, obj: &ObjId) -> Result<Value, EngineError> {
    let mut map = Map::new();
    for key in doc.keys(obj) {
        let value = read_prop(doc, obj, &key)?;
        map.insert(key, value);
    }
    Ok(Value::Object(map))
}

fn read_list(doc: &AutoCommit, obj: &ObjId) -> Result<Value, EngineError> {
    let len = doc.length(obj);
    let mut items = Vec::with_capacity(len);
    for index in 0..len {
        let item = match doc.get(obj, index)? {
            Some((value, id)) => read_value(doc, &value, &id)?,
            None => Value::Null,
        };
        items.push(item);
    }
    Ok(Value::Array(items))
}

fn scalar_to_json(scalar: &ScalarValue) -> Result<Value, EngineError> {
    let value = match scalar {
        ScalarValue::Null => Value::Null,
        ScalarValue::Boolean(b) => Value::Bool(*b),
        ScalarValue::Int(i) => Value::Number((*i).into()),
        ScalarValue::Uint(u) => Value::Number((*u).into()),
        ScalarValue::F64(f) => match Number::from_f64(*f) {
            Some(n) => Value::Number(n),
            None => {
                return Err(EngineError::Unrepresentable(format!(
                    "non-finite number {f}"
                )))
            }
        },
        ScalarValue::Counter(c) => Value::Number(i64::from(c).into()),
        ScalarValue::Timestamp(t) => Value::Number((*t).into()),
        ScalarValue::Bytes(bytes) => Value::String(BASE64.encode(bytes)),
        ScalarValue::Str(s) => Value::String(s.to_string()),
        ScalarValue::Unknown { .. } => Value::Null,
    };
    Ok(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────
