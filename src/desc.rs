// Tagged field-type descriptors. No serde_json::Value here.

use std::fmt;

/// Scalar shapes the codec carries through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    Bool,
    Int,                     // i64 / i32
    Uint,                    // u64 / u32
    Float,                   // f64 (non-finite values render as null)
    Str,
    Any,                     // raw JSON passthrough, never parsed
}

/// Closed set of declared field types.
///
/// Field parsing is an exhaustive dispatch over this enum rather than
/// runtime inspection of the stored value.
#[derive(Debug, Clone)]
pub enum TypeDesc {
    Primitive(Prim),
    Record {
        name: &'static str,
        /// Fetched lazily so self- and mutually-recursive record types
        /// stay representable.
        schema: fn() -> &'static RecordSchema,
    },
    /// Homogeneous ordered sequence; only the element type is refined.
    Sequence(Box<TypeDesc>),
}

#[derive(Debug, Clone)]
pub struct FieldDesc {
    pub name: &'static str,
    pub ty: TypeDesc,
}

/// Name plus declaration-ordered fields of one record type.
///
/// Materialized once per type by the `jsonable!` expansion; never stored
/// per instance.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: Vec<FieldDesc>,
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Prim::Bool => "bool",
            Prim::Int => "int",
            Prim::Uint => "uint",
            Prim::Float => "float",
            Prim::Str => "string",
            Prim::Any => "any",
        };
        f.write_str(s)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Primitive(p) => write!(f, "{p}"),
            // Nested records print by name only; their own fields are one
            // `schema()` call away.
            TypeDesc::Record { name, .. } => f.write_str(name),
            TypeDesc::Sequence(inner) => write!(f, "[{inner}]"),
        }
    }
}

impl fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.ty)?;
        }
        f.write_str(" }")
    }
}

// ------------------------------- Tests ------------------------------------ //
