//! The `jsonable!` registration macro.

/// Declare a record type with automatic two-way JSON conversion.
///
/// Takes a plain struct definition and emits the struct together with its
/// [`Jsonable`](crate::Jsonable) implementation, its field schema, its
/// [`FieldCodec`](crate::FieldCodec) hook (so it can nest inside other
/// records), and a `serde::Serialize` bridge so instances plug into any
/// serde-based writer.
///
/// Field types must be supported shapes: `bool`, `i32`/`i64`, `u32`/`u64`,
/// `f64`, `String`, `serde_json::Value`, another `jsonable!` record, or
/// `Vec` of any of these. Anything else fails to compile.
///
/// ```
/// use jsonable::{jsonable, Jsonable};
///
/// jsonable! {
///     pub struct Point {
///         pub x: i64,
///         pub y: i64,
///     }
/// }
///
/// let p = Point::from_json(&serde_json::json!({"x": 1, "y": 2}))?;
/// assert_eq!(p.x, 1);
/// # Ok::<(), jsonable::DecodeError>(())
/// ```
#[macro_export]
macro_rules! jsonable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field : $field_ty,
            )+
        }

        impl $crate::Jsonable for $name {
            fn schema() -> &'static $crate::desc::RecordSchema {
                static SCHEMA: $crate::__macro::Lazy<$crate::desc::RecordSchema> =
                    $crate::__macro::Lazy::new(|| $crate::desc::RecordSchema {
                        name: stringify!($name),
                        fields: vec![
                            $(
                                $crate::desc::FieldDesc {
                                    name: stringify!($field),
                                    ty: <$field_ty as $crate::FieldCodec>::type_desc(),
                                },
                            )+
                        ],
                    });
                &SCHEMA
            }

            fn to_json(
                &self,
            ) -> $crate::__macro::IndexMap<::std::string::String, $crate::encode::Writable> {
                let mut out = $crate::__macro::IndexMap::with_capacity(
                    <Self as $crate::Jsonable>::schema().fields.len(),
                );
                $(
                    out.insert(
                        stringify!($field).to_owned(),
                        $crate::FieldCodec::to_field(&self.$field),
                    );
                )+
                out
            }

            fn from_json(
                j: &$crate::__macro::Value,
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                let map = j.as_object().ok_or_else(|| {
                    $crate::error::DecodeError::NotAMapping {
                        record: stringify!($name),
                        got: $crate::json_kind(j),
                    }
                })?;
                ::std::result::Result::Ok(Self {
                    $(
                        $field: {
                            let raw = map.get(stringify!($field)).ok_or(
                                $crate::error::DecodeError::MissingField {
                                    record: stringify!($name),
                                    field: stringify!($field),
                                },
                            )?;
                            <$field_ty as $crate::FieldCodec>::from_field(raw).map_err(
                                |source| $crate::error::DecodeError::Field {
                                    record: stringify!($name),
                                    field: stringify!($field),
                                    source: ::std::boxed::Box::new(source),
                                },
                            )?
                        },
                    )+
                })
            }
        }

        impl $crate::FieldCodec for $name {
            fn type_desc() -> $crate::desc::TypeDesc {
                $crate::desc::TypeDesc::Record {
                    name: stringify!($name),
                    schema: <$name as $crate::Jsonable>::schema,
                }
            }
            fn to_field(&self) -> $crate::encode::Writable {
                // Stays unresolved until the writer lowers the tree.
                $crate::encode::Writable::record(self.clone())
            }
            fn from_field(
                v: &$crate::__macro::Value,
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                <$name as $crate::Jsonable>::from_json(v)
            }
        }

        impl $crate::__macro::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__macro::serde::Serializer,
            {
                use $crate::__macro::serde::ser::Error as _;
                let tree = $crate::encode::Writable::Map($crate::Jsonable::to_json(self));
                let value = $crate::encode::lower(&tree).map_err(S::Error::custom)?;
                $crate::__macro::serde::Serialize::serialize(&value, serializer)
            }
        }
    };
}
