use crate::serde::WireValue;
use crate::WireError;
use derive_more::{Deref, From};

/// An interned protocol string: composite field keys, SASL mechanism
/// names, symbolic descriptors.
#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct Symbol(pub String);

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<Symbol> for WireValue {
    fn from(sym: Symbol) -> Self {
        WireValue::Symbol(sym.0)
    }
}

impl TryFrom<&WireValue> for Symbol {
    type Error = WireError;
    fn try_from(value: &WireValue) -> Result<Self, WireError> {
        match value {
            WireValue::Symbol(s) => Ok(Self(s.clone())),
            other => Err(WireError::type_mismatch("symbol", other.tag_name())),
        }
    }
}
