//! Record codec: the `Jsonable` capability attached to declared record
//! types, and the per-field parse/serialize hooks it recurses through.
//!
//! Design goals:
//! - Declaration-order field mappings in and out; no coercion between
//!   scalar kinds.
//! - Dispatch is trait dispatch over a closed descriptor set, never
//!   runtime probing of the stored value.
//! - Serialization stays shallow: nested records leave `to_json` as
//!   unresolved `Writable::Record` leaves and the writer lowers them at
//!   write time (see `encode`).

use indexmap::IndexMap;
use serde_json::Value;

use crate::desc::{Prim, RecordSchema, TypeDesc};
use crate::encode::Writable;
use crate::error::DecodeError;

// ------------------------------- Traits ----------------------------------- //

/// Two-way JSON capability installed on every record type declared through
/// [`jsonable!`](crate::jsonable).
pub trait Jsonable: Sized {
    /// Name plus declaration-ordered field descriptors of this type.
    fn schema() -> &'static RecordSchema;

    /// Mapping of exactly the declared fields, in declaration order.
    ///
    /// Nested record fields are left unresolved; the writer consults their
    /// codec when the tree is lowered. Never fails.
    fn to_json(&self) -> IndexMap<String, Writable>;

    /// Parse a JSON mapping into a new instance.
    ///
    /// Walks the declared fields in order, pulling each key from `j` and
    /// resolving it through [`FieldCodec::from_field`]. A missing key or a
    /// value of the wrong shape is a hard failure.
    fn from_json(j: &Value) -> Result<Self, DecodeError>;
}

/// Per-field conversion consulted by generated [`Jsonable`] impls.
///
/// Implementations exist for the supported scalars, for `Vec<T>` of any
/// field type, for raw [`Value`] (opaque passthrough), and for every
/// declared record type. Anything else (options, maps, tuples) has no
/// implementation and is rejected when the declaring struct compiles.
pub trait FieldCodec: Sized {
    /// Tagged descriptor for this field type.
    fn type_desc() -> TypeDesc;

    /// Serialize one stored field value.
    fn to_field(&self) -> Writable;

    /// Recursive resolution of one field from input JSON:
    /// record types delegate to their own `from_json`, sequences resolve
    /// elementwise, scalars extract the matching JSON shape unchanged.
    fn from_field(v: &Value) -> Result<Self, DecodeError>;
}

// ------------------------------- Helpers ---------------------------------- //

/// Human-readable tag for the JSON shape of `v`, used in diagnostics.
pub fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

fn type_error<T: FieldCodec>(v: &Value) -> DecodeError {
    DecodeError::Type {
        expected: T::type_desc().to_string(),
        got: json_kind(v),
    }
}

/// Parse JSON text straight into a record instance.
pub fn from_json_str<T: Jsonable>(src: &str) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(src)?;
    T::from_json(&value)
}

// --------------------------- Scalar impls --------------------------------- //

impl FieldCodec for bool {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Bool)
    }
    fn to_field(&self) -> Writable {
        Writable::Json(Value::from(*self))
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        v.as_bool().ok_or_else(|| type_error::<Self>(v))
    }
}

impl FieldCodec for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Str)
    }
    fn to_field(&self) -> Writable {
        Writable::Json(Value::from(self.clone()))
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        v.as_str().map(str::to_owned).ok_or_else(|| type_error::<Self>(v))
    }
}

impl FieldCodec for f64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Float)
    }
    fn to_field(&self) -> Writable {
        // Non-finite floats have no JSON rendering; `From<f64>` lowers
        // them to null.
        Writable::Json(Value::from(*self))
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        v.as_f64().ok_or_else(|| type_error::<Self>(v))
    }
}

impl FieldCodec for i64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Int)
    }
    fn to_field(&self) -> Writable {
        Writable::Json(Value::from(*self))
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        v.as_i64().ok_or_else(|| type_error::<Self>(v))
    }
}

impl FieldCodec for u64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Uint)
    }
    fn to_field(&self) -> Writable {
        Writable::Json(Value::from(*self))
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        v.as_u64().ok_or_else(|| type_error::<Self>(v))
    }
}

impl FieldCodec for i32 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Int)
    }
    fn to_field(&self) -> Writable {
        Writable::Json(Value::from(*self))
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        // Range overflow is a type mismatch, not a silent wrap.
        v.as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| type_error::<Self>(v))
    }
}

impl FieldCodec for u32 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Uint)
    }
    fn to_field(&self) -> Writable {
        Writable::Json(Value::from(*self))
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        v.as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| type_error::<Self>(v))
    }
}

/// Opaque passthrough: the declared escape hatch for shapes the codec does
/// not model. The value crosses both directions byte-for-byte unparsed.
impl FieldCodec for Value {
    fn type_desc() -> TypeDesc {
        TypeDesc::Primitive(Prim::Any)
    }
    fn to_field(&self) -> Writable {
        Writable::Json(self.clone())
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        Ok(v.clone())
    }
}

// -------------------------- Sequence impl --------------------------------- //

impl<T: FieldCodec> FieldCodec for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Sequence(Box::new(T::type_desc()))
    }
    fn to_field(&self) -> Writable {
        Writable::Seq(self.iter().map(FieldCodec::to_field).collect())
    }
    fn from_field(v: &Value) -> Result<Self, DecodeError> {
        let xs = v.as_array().ok_or_else(|| type_error::<Self>(v))?;
        xs.iter()
            .enumerate()
            .map(|(index, el)| {
                T::from_field(el).map_err(|source| DecodeError::Element {
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{lower, to_value};
    use crate::jsonable;
    use serde_json::json;

    jsonable! {
        struct Point {
            x: i64,
            y: i64,
        }
    }

    jsonable! {
        struct Line {
            a: Point,
            b: Point,
        }
    }

    jsonable! {
        struct Polyline {
            label: String,
            closed: bool,
            points: Vec<Point>,
        }
    }

    jsonable! {
        struct Everything {
            id: u64,
            offset: i64,
            small: i32,
            count: u32,
            ratio: f64,
            title: String,
            flag: bool,
            raw: serde_json::Value,
            tags: Vec<String>,
            grid: Vec<Vec<i64>>,
        }
    }

    jsonable! {
        /// Self-referential record type; recursion follows the (finite)
        /// data, so parsing terminates.
        struct Tree {
            tag: String,
            children: Vec<Tree>,
        }
    }

    #[test]
    fn scalar_round_trip() {
        let v = json!(42);
        assert_eq!(i64::from_field(&v).unwrap(), 42);
        assert_eq!(u64::from_field(&v).unwrap(), 42);
        assert_eq!(f64::from_field(&v).unwrap(), 42.0);

        let v = json!("hi");
        assert_eq!(String::from_field(&v).unwrap(), "hi");

        let v = json!(true);
        assert!(bool::from_field(&v).unwrap());
    }

    #[test]
    fn scalar_type_mismatch_is_reported() {
        let err = i64::from_field(&json!("nope")).unwrap_err();
        match err {
            DecodeError::Type { expected, got } => {
                assert_eq!(expected, "int");
                assert_eq!(got, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_cross_scalar_coercion() {
        // JSON booleans never become numbers, strings never become bools.
        assert!(i64::from_field(&json!(true)).is_err());
        assert!(bool::from_field(&json!("true")).is_err());
        // Fractional numbers do not silently truncate into integers.
        assert!(i64::from_field(&json!(1.5)).is_err());
        // But any JSON number widens into f64.
        assert_eq!(f64::from_field(&json!(7)).unwrap(), 7.0);
    }

    #[test]
    fn narrow_integers_check_range() {
        assert!(i32::from_field(&json!(i64::from(i32::MAX) + 1)).is_err());
        assert!(u32::from_field(&json!(u64::from(u32::MAX) + 1)).is_err());
        assert_eq!(i32::from_field(&json!(-5)).unwrap(), -5);
    }

    #[test]
    fn nested_record() {
        let j = json!({"a": {"x": 1, "y": 2}, "b": {"x": 3, "y": 4}});
        let line = Line::from_json(&j).unwrap();
        assert_eq!(line.a, Point { x: 1, y: 2 });
        assert_eq!(line.b, Point { x: 3, y: 4 });
    }

    #[test]
    fn sequence_of_nested_records() {
        let j = json!({
            "label": "l",
            "closed": false,
            "points": [{"x": 0, "y": 0}, {"x": 1, "y": 1}],
        });
        let poly = Polyline::from_json(&j).unwrap();
        assert_eq!(poly.points, vec![Point { x: 0, y: 0 }, Point { x: 1, y: 1 }]);
    }

    #[test]
    fn missing_field() {
        let err = Point::from_json(&json!({})).unwrap_err();
        match err {
            DecodeError::MissingField { record, field } => {
                assert_eq!(record, "Point");
                assert_eq!(field, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_mapping_input() {
        let err = Point::from_json(&json!([1, 2])).unwrap_err();
        match err {
            DecodeError::NotAMapping { record, got } => {
                assert_eq!(record, "Point");
                assert_eq!(got, "array");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_keys_are_ignored() {
        // Input is trusted; only declared fields are consulted.
        let j = json!({"x": 1, "y": 2, "z": 99});
        let p = Point::from_json(&j).unwrap();
        assert_eq!(p, Point { x: 1, y: 2 });
    }

    #[test]
    fn nested_failure_names_the_path() {
        let j = json!({"a": {"x": 1, "y": "two"}, "b": {"x": 3, "y": 4}});
        let err = Line::from_json(&j).unwrap_err();
        let msg = err.to_string();
        assert_eq!(
            msg,
            "record `Line` field `a`: record `Point` field `y`: expected int, got string"
        );
    }

    #[test]
    fn sequence_failure_names_the_element() {
        let j = json!({
            "label": "l",
            "closed": true,
            "points": [{"x": 0, "y": 0}, {"x": 1}],
        });
        let err = Polyline::from_json(&j).unwrap_err();
        let msg = err.to_string();
        assert_eq!(
            msg,
            "record `Polyline` field `points`: element 1: record `Point`: missing field `y`"
        );
    }

    #[test]
    fn round_trip_composite() {
        let original = Everything {
            id: 7,
            offset: -3,
            small: -12,
            count: 800,
            ratio: 0.25,
            title: "probe".into(),
            flag: true,
            raw: json!({"free": ["form", 1, null]}),
            tags: vec!["a".into(), "b".into()],
            grid: vec![vec![1, 2], vec![], vec![3]],
        };
        let value = to_value(&original).unwrap();
        let back = Everything::from_json(&value).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn round_trip_through_text() {
        let original = Polyline {
            label: "ring".into(),
            closed: true,
            points: vec![Point { x: 9, y: -9 }],
        };
        let text = crate::encode::to_string(&original).unwrap();
        let back: Polyline = from_json_str(&text).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn from_json_str_surfaces_syntax_errors() {
        let err = from_json_str::<Point>("{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
    }

    #[test]
    fn to_json_preserves_declaration_order() {
        let p = Polyline {
            label: "l".into(),
            closed: false,
            points: vec![],
        };
        let json = p.to_json();
        let keys: Vec<&str> = json.keys().map(String::as_str).collect();
        assert_eq!(keys, ["label", "closed", "points"]);

        // Order survives lowering to serde_json as well (preserve_order).
        let value = to_value(&p).unwrap();
        let out_keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(out_keys, ["label", "closed", "points"]);
    }

    #[test]
    fn to_json_is_shallow() {
        // Nested records stay unresolved until the writer runs.
        let line = Line {
            a: Point { x: 1, y: 2 },
            b: Point { x: 3, y: 4 },
        };
        let fields = line.to_json();
        assert!(matches!(fields["a"], Writable::Record(_)));
        assert!(matches!(fields["b"], Writable::Record(_)));

        // The writer resolves them.
        let value = lower(&Writable::Map(fields)).unwrap();
        assert_eq!(value, json!({"a": {"x": 1, "y": 2}, "b": {"x": 3, "y": 4}}));
    }

    #[test]
    fn value_fields_pass_through_unparsed() {
        let j = json!({
            "id": 1, "offset": 0, "small": 0, "count": 0, "ratio": 0.0,
            "title": "", "flag": false,
            "raw": {"nested": {"deeply": [true]}},
            "tags": [], "grid": [],
        });
        let e = Everything::from_json(&j).unwrap();
        assert_eq!(e.raw, json!({"nested": {"deeply": [true]}}));
    }

    #[test]
    fn schema_introspection() {
        let schema = Polyline::schema();
        assert_eq!(schema.name, "Polyline");
        let names: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["label", "closed", "points"]);

        // `points` is a sequence of a record; the nested schema is reachable.
        match &schema.field("points").unwrap().ty {
            TypeDesc::Sequence(inner) => match inner.as_ref() {
                TypeDesc::Record { name, schema } => {
                    assert_eq!(*name, "Point");
                    assert_eq!(schema().fields.len(), 2);
                }
                other => panic!("unexpected element desc: {other}"),
            },
            other => panic!("unexpected desc: {other}"),
        }

        assert_eq!(
            schema.to_string(),
            "Polyline { label: string, closed: bool, points: [Point] }"
        );
    }

    #[test]
    fn recursive_record_type_round_trips() {
        let tree = Tree {
            tag: "root".into(),
            children: vec![
                Tree { tag: "left".into(), children: vec![] },
                Tree {
                    tag: "right".into(),
                    children: vec![Tree { tag: "leaf".into(), children: vec![] }],
                },
            ],
        };
        let value = to_value(&tree).unwrap();
        assert_eq!(
            value,
            json!({
                "tag": "root",
                "children": [
                    {"tag": "left", "children": []},
                    {"tag": "right", "children": [{"tag": "leaf", "children": []}]},
                ],
            })
        );
        let back = Tree::from_json(&value).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn sequence_expects_an_array() {
        let j = json!({"label": "l", "closed": true, "points": {"x": 1}});
        let err = Polyline::from_json(&j).unwrap_err();
        assert_eq!(
            err.to_string(),
            "record `Polyline` field `points`: expected [Point], got mapping"
        );
    }
}
