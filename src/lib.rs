//! Declarative two-way JSON conversion for record types.
//!
//! Declare a struct through [`jsonable!`] and it gains a [`Jsonable`]
//! implementation: `to_json` produces an ordered mapping of its declared
//! fields, `from_json` parses a JSON mapping back into an instance,
//! recursing through nested records and sequences without per-type
//! boilerplate.
//!
//! Design goals:
//! - Declaration drives everything: field names, order, and types come
//!   from the struct definition; no runtime registration step.
//! - Dispatch is trait dispatch over a closed set of tagged type
//!   descriptors ([`TypeDesc`]); unsupported field shapes (options, maps,
//!   tuples) fail to compile rather than silently passing through.
//! - Serialization is shallow: nested records resolve in the writer
//!   ([`encode`]), which also rejects values with no JSON rendering.
//! - Round-trip: for supported shapes, `from_json(to_value(x)) == x`.
//!
//! ```
//! use jsonable::{jsonable, Jsonable};
//!
//! jsonable! {
//!     pub struct Point {
//!         pub x: i64,
//!         pub y: i64,
//!     }
//! }
//!
//! jsonable! {
//!     pub struct Line {
//!         pub a: Point,
//!         pub b: Point,
//!     }
//! }
//!
//! let line = Line::from_json(&serde_json::json!({
//!     "a": {"x": 1, "y": 2},
//!     "b": {"x": 3, "y": 4},
//! }))?;
//! assert_eq!(line.a, Point { x: 1, y: 2 });
//! assert_eq!(jsonable::to_string(&line)?, r#"{"a":{"x":1,"y":2},"b":{"x":3,"y":4}}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod desc;
pub mod encode;
pub mod error;
mod macros;

pub use codec::{from_json_str, json_kind, FieldCodec, Jsonable};
pub use desc::{FieldDesc, Prim, RecordSchema, TypeDesc};
pub use encode::{
    lower, to_string, to_string_pretty, to_value, write_json, write_json_pretty, DynRecord,
    Writable,
};
pub use error::{DecodeError, EncodeError};

// Re-exports for `jsonable!` expansions; not public API.
#[doc(hidden)]
pub mod __macro {
    pub use indexmap::IndexMap;
    pub use once_cell::sync::Lazy;
    pub use serde;
    pub use serde_json::Value;
}
