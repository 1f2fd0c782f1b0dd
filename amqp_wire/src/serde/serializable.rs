use crate::serde::value::ser as value_ser;
use crate::serde::{Descriptor, EncodedBuffer, FormatCode, WireValue};
use crate::WireError;
use derive_more::Deref;
use std::io::Write;

#[derive(Deref, Clone, Copy)]
pub struct WriteLen(pub(crate) usize);
impl WriteLen {
    pub fn new_manual(i: usize) -> Self {
        Self(i)
    }
}

/// Writes one value in its AMQP encoding.
pub trait Ser {
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError>;

    fn ser_solo(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = vec![];
        self.ser(&mut buf)?;
        Ok(buf)
    }
}

/// Reads one value out of an [`EncodedBuffer`] view.
pub trait Deser: Sized {
    /// Whether this type can be decoded from an encoding with the given
    /// format code. Null is handled before this check, by the callers
    /// that support absent values.
    fn accepts(code: FormatCode) -> bool;

    fn deser(view: &EncodedBuffer<'_>) -> Result<Self, WireError>;
}

impl Ser for WireValue {
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        WireValue::ser(self, w)
    }
}
impl Deser for WireValue {
    fn accepts(_code: FormatCode) -> bool {
        true
    }
    fn deser(view: &EncodedBuffer<'_>) -> Result<Self, WireError> {
        WireValue::deser(view)
    }
}

/* The list/map bodies of composite types are de/serializable on their
 * own, so that a described wrapper can carry either. */

impl Ser for Vec<WireValue> {
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        value_ser::ser_list(self, w)
    }
}
impl Deser for Vec<WireValue> {
    fn accepts(code: FormatCode) -> bool {
        code.is_list()
    }
    fn deser(view: &EncodedBuffer<'_>) -> Result<Self, WireError> {
        view.list_elements()?
            .map(|element| WireValue::deser(&element?))
            .collect()
    }
}

impl Ser for Vec<(WireValue, WireValue)> {
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        value_ser::ser_map(self, w)
    }
}
impl Deser for Vec<(WireValue, WireValue)> {
    fn accepts(code: FormatCode) -> bool {
        code.is_map()
    }
    fn deser(view: &EncodedBuffer<'_>) -> Result<Self, WireError> {
        view.map_entries()?
            .map(|entry| {
                let (key, value) = entry?;
                Ok((WireValue::deser(&key)?, WireValue::deser(&value)?))
            })
            .collect()
    }
}

impl Ser for Descriptor {
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        Descriptor::ser(self, w)
    }
}
impl Deser for Descriptor {
    fn accepts(code: FormatCode) -> bool {
        code.is_ulong() || code.is_symbol()
    }
    fn deser(view: &EncodedBuffer<'_>) -> Result<Self, WireError> {
        Descriptor::deser(view)
    }
}
