//! Fallback encoder: the writer's dynamic input tree and the lowering pass
//! that resolves record leaves through their codec.
//!
//! The writer natively understands plain JSON data. Everything else it is
//! handed must either carry a codec (a declared record) or gets rejected
//! with a hard error. Recursion for nested records happens here, at write
//! time; `to_json` itself stays shallow.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::codec::Jsonable;
use crate::error::EncodeError;

// ------------------------------- Types ------------------------------------ //

/// Object-safe view of a record instance, so one tree can carry records of
/// different types.
pub trait DynRecord: fmt::Debug {
    fn record_name(&self) -> &'static str;

    /// Declared-field mapping, nested records left unresolved.
    fn fields(&self) -> IndexMap<String, Writable>;
}

impl<T: Jsonable + fmt::Debug> DynRecord for T {
    fn record_name(&self) -> &'static str {
        T::schema().name
    }
    fn fields(&self) -> IndexMap<String, Writable> {
        self.to_json()
    }
}

/// What the writer can be handed: the JSON data model itself, plus two
/// kinds of leaf it does not natively understand: records, which carry
/// their own codec, and opaque host values, which do not.
#[derive(Debug)]
pub enum Writable {
    /// Data the writer already knows how to render.
    Json(Value),
    /// A declared record; resolved by consulting its codec.
    Record(Box<dyn DynRecord>),
    /// Ordered sequence, possibly mixing leaf kinds.
    Seq(Vec<Writable>),
    /// Ordered mapping, possibly mixing leaf kinds.
    Map(IndexMap<String, Writable>),
    /// A host value with no JSON rendering; the writer must reject it.
    Opaque { type_name: &'static str },
}

impl Writable {
    /// Wrap a record instance as a writer leaf.
    pub fn record<T>(record: T) -> Self
    where
        T: Jsonable + fmt::Debug + 'static,
    {
        Writable::Record(Box::new(record))
    }

    /// Tag a host value the writer has no rendering for. Lowering a tree
    /// containing this leaf always fails.
    pub fn opaque<T>() -> Self {
        Writable::Opaque {
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl From<Value> for Writable {
    fn from(v: Value) -> Self {
        Writable::Json(v)
    }
}

impl From<bool> for Writable {
    fn from(v: bool) -> Self {
        Writable::Json(Value::from(v))
    }
}

impl From<i64> for Writable {
    fn from(v: i64) -> Self {
        Writable::Json(Value::from(v))
    }
}

impl From<f64> for Writable {
    fn from(v: f64) -> Self {
        Writable::Json(Value::from(v))
    }
}

impl From<&str> for Writable {
    fn from(v: &str) -> Self {
        Writable::Json(Value::from(v))
    }
}

// ------------------------------- Lowering --------------------------------- //

/// Lower a writer tree to plain JSON data.
///
/// Record leaves resolve through their codec here: the record's shallow
/// field mapping is taken and lowered in turn, so arbitrarily nested
/// records flatten out without the codec ever recursing itself. Opaque
/// leaves are a hard failure and no partial output is produced.
pub fn lower(w: &Writable) -> Result<Value, EncodeError> {
    match w {
        Writable::Json(v) => Ok(v.clone()),
        Writable::Record(r) => lower_fields(&r.fields()),
        Writable::Seq(xs) => {
            let out = xs.iter().map(lower).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(out))
        }
        Writable::Map(m) => lower_fields(m),
        Writable::Opaque { type_name } => {
            Err(EncodeError::NotSerializable { type_name })
        }
    }
}

fn lower_fields(fields: &IndexMap<String, Writable>) -> Result<Value, EncodeError> {
    // serde_json::Map preserves insertion order (preserve_order feature),
    // so declaration order survives into the output.
    let mut out = serde_json::Map::with_capacity(fields.len());
    for (key, w) in fields {
        out.insert(key.clone(), lower(w)?);
    }
    Ok(Value::Object(out))
}

// ----------------------------- Text surface ------------------------------- //

/// Render a writer tree as compact JSON text.
pub fn write_json(w: &Writable) -> Result<String, EncodeError> {
    let value = lower(w)?;
    Ok(serde_json::to_string(&value)?)
}

/// Render a writer tree as pretty-printed JSON text.
pub fn write_json_pretty(w: &Writable) -> Result<String, EncodeError> {
    let value = lower(w)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Serialize a record all the way down to plain JSON data.
pub fn to_value<T>(record: &T) -> Result<Value, EncodeError>
where
    T: Jsonable + fmt::Debug,
{
    lower(&Writable::Map(record.to_json()))
}

/// Serialize a record to compact JSON text.
pub fn to_string<T>(record: &T) -> Result<String, EncodeError>
where
    T: Jsonable + fmt::Debug,
{
    let value = to_value(record)?;
    Ok(serde_json::to_string(&value)?)
}

/// Serialize a record to pretty-printed JSON text.
pub fn to_string_pretty<T>(record: &T) -> Result<String, EncodeError>
where
    T: Jsonable + fmt::Debug,
{
    let value = to_value(record)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

// ------------------------------- Tests ------------------------------------ //
