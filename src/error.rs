use thiserror::Error;

/// Failures surfaced while parsing JSON data into record instances.
///
/// No recovery happens anywhere below the top-level entry point: the first
/// failure propagates out and no partial record is produced.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A declared field key was absent from the input mapping.
    #[error("record `{record}`: missing field `{field}`")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// Deserialize was handed something other than a JSON mapping.
    #[error("record `{record}`: expected a JSON mapping, got {got}")]
    NotAMapping {
        record: &'static str,
        got: &'static str,
    },

    /// Input data did not match the declared field type.
    #[error("expected {expected}, got {got}")]
    Type {
        expected: String,
        got: &'static str,
    },

    /// Context frame naming the record and field a nested failure occurred
    /// in. Frames chain through nested records, so the rendered message
    /// reads as a full path down to the offending value.
    #[error("record `{record}` field `{field}`: {source}")]
    Field {
        record: &'static str,
        field: &'static str,
        #[source]
        source: Box<DecodeError>,
    },

    /// Context frame for a sequence element.
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },

    /// Input text was not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Failures surfaced while writing a value tree out as JSON.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The writer reached a host value it has no JSON rendering for.
    #[error("value of type `{type_name}` is not JSON-serializable")]
    NotSerializable { type_name: &'static str },

    /// The underlying JSON writer failed.
    #[error("JSON write failed: {0}")]
    Write(#[from] serde_json::Error),
}
