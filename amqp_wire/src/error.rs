use std::fmt;
use std::io;

/// Errors raised while reading or producing AMQP 1.0 wire data.
///
/// Every variant describes a malformed or unexpected input; none of them
/// indicates a bug in the caller. Caller-contract violations (positional
/// access outside a schema, mutating a frozen bean) panic instead, so that
/// protocol layers cannot mistake a programming error for bad wire data.
#[derive(Debug)]
pub enum WireError {
    /// The leading byte is not a format code this codec knows.
    UnknownFormatCode { code: u8 },
    /// The backing span ends before the encoded value does.
    Truncated { needed: usize, available: usize },
    /// Structurally invalid wire data: null map key, odd map count,
    /// invalid utf-8 in a symbol/string, absent required field, etc.
    Encoding { reason: String },
    /// The format code or descriptor does not denote what the caller
    /// or target type expects.
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    /// A map entry key is not among the composite schema's fields.
    UnexpectedField {
        symbolic_id: &'static str,
        key: String,
    },
    /// The underlying byte-input source failed.
    Io(io::Error),
}

impl WireError {
    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::Encoding {
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(expected: &'static str, found: impl fmt::Display) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.to_string(),
        }
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFormatCode { code } => {
                write!(f, "Unknown format code {code:#04x}")
            }
            Self::Truncated { needed, available } => {
                write!(
                    f,
                    "Truncated encoding: {needed} bytes needed, {available} available"
                )
            }
            Self::Encoding { reason } => {
                write!(f, "Malformed encoding: {reason}")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {expected}, found {found}")
            }
            Self::UnexpectedField { symbolic_id, key } => {
                write!(f, "Unexpected field for {symbolic_id}: {key}")
            }
            Self::Io(e) => {
                write!(f, "Read failed: {e}")
            }
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for WireError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
