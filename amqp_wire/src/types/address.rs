use crate::serde::WireValue;
use crate::WireError;
use derive_more::{Deref, From};

/// A node address, carried on the wire as a binary. Addresses are
/// usually printable (`queue://billing`), but the wire form does not
/// require it.
#[derive(From, Deref, PartialEq, Eq, Hash, Clone, Debug)]
pub struct Address(pub Vec<u8>);

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl Address {
    /// The printable form, when the address happens to be utf-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl From<Address> for WireValue {
    fn from(addr: Address) -> Self {
        WireValue::Binary(addr.0)
    }
}

impl TryFrom<&WireValue> for Address {
    type Error = WireError;
    fn try_from(value: &WireValue) -> Result<Self, WireError> {
        match value {
            WireValue::Binary(b) => Ok(Self(b.clone())),
            other => Err(WireError::type_mismatch("binary address", other.tag_name())),
        }
    }
}
