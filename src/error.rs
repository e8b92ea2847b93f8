use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised while loading a document or reading an object graph out of it.
///
/// A field that is simply absent is not an error: by-name reads return the
/// default value (or `None` for lists) in that case. Every variant below
/// aborts the read of the enclosing object.
pub enum MwsError {
    #[error("malformed XML document: {0}")]
    MalformedDocument(String),

    #[error("cannot read null node")]
    NullNode,

    #[error("attribute '{0}' does not exist")]
    MissingAttribute(String),

    #[error("cannot read current value: cursor is not on a text node")]
    NotTextNode,

    #[error("cannot parse '{value}' as decimal: {reason}")]
    NumericParse { value: String, reason: String },

    #[error("'{value}' is not a member of {enumeration}")]
    UnknownEnumMember {
        enumeration: &'static str,
        value: String,
    },

    #[error("cannot convert '{value}' to {target}: {reason}")]
    TypeConversion {
        value: String,
        target: &'static str,
        reason: String,
    },

    #[error("unsupported type for conversion from string: {0}")]
    UnsupportedConversionType(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, MwsError>;
