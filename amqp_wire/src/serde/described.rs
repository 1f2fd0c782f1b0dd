use crate::serde::{
    reader, Descriptor, Deser, EncodedBuffer, FormatCode, Ser, WriteLen,
};
use crate::WireError;
use std::io::{Read, Write};
use std::sync::OnceLock;

/// A composite (described) value: a descriptor naming the schema, plus
/// an underlying primitive encoding (typically a list or map) of type
/// `T`.
///
/// Mirrors [`Encoded`](crate::serde::Encoded) with descriptor
/// verification layered on: decoding accepts a wire descriptor equal to
/// either the numeric or the symbolic id, while encoding always writes
/// the numeric form — the fixed nine bytes `0x80` + big-endian category
/// + big-endian descriptor id that external decoders depend on.
pub struct DescribedEncoded<'a, T> {
    numeric_id: u64,
    symbolic_id: &'static str,
    repr: Repr<'a, T>,
    bytes: OnceLock<Vec<u8>>,
    value: OnceLock<T>,
}

enum Repr<'a, T> {
    Value(T),
    /// A whole described span (format code `0x00` onward), descriptor
    /// already verified.
    Span(EncodedBuffer<'a>),
    Owned(Vec<u8>),
}

impl<'a, T> DescribedEncoded<'a, T>
where
    T: Ser + Deser,
{
    pub fn from_value(numeric_id: u64, symbolic_id: &'static str, value: T) -> Self {
        Self {
            numeric_id,
            symbolic_id,
            repr: Repr::Value(value),
            bytes: OnceLock::new(),
            value: OnceLock::new(),
        }
    }

    /// Wraps a described span after verifying its descriptor names this
    /// type, by either id form. Fails with [`WireError::TypeMismatch`]
    /// naming the offending descriptor otherwise.
    pub fn from_buffer(
        numeric_id: u64,
        symbolic_id: &'static str,
        view: EncodedBuffer<'a>,
    ) -> Result<Self, WireError> {
        Self::verify(numeric_id, symbolic_id, &view)?;
        Ok(Self {
            numeric_id,
            symbolic_id,
            repr: Repr::Span(view),
            bytes: OnceLock::new(),
            value: OnceLock::new(),
        })
    }

    /// Takes ownership of one described value's bytes (as produced by
    /// [`reader::read_encoded`]), verifying the descriptor eagerly.
    pub fn from_owned(
        numeric_id: u64,
        symbolic_id: &'static str,
        bytes: Vec<u8>,
    ) -> Result<DescribedEncoded<'static, T>, WireError> {
        let view = EncodedBuffer::new(&bytes, 0)?;
        Self::verify(numeric_id, symbolic_id, &view)?;
        Ok(DescribedEncoded {
            numeric_id,
            symbolic_id,
            repr: Repr::Owned(bytes),
            bytes: OnceLock::new(),
            value: OnceLock::new(),
        })
    }

    pub fn from_reader(
        numeric_id: u64,
        symbolic_id: &'static str,
        r: &mut impl Read,
    ) -> Result<DescribedEncoded<'static, T>, WireError> {
        let bytes = reader::read_encoded(r)?;
        Self::from_owned(numeric_id, symbolic_id, bytes)
    }

    fn verify(
        numeric_id: u64,
        symbolic_id: &'static str,
        view: &EncodedBuffer<'_>,
    ) -> Result<(), WireError> {
        let described = view.as_described()?;
        let descriptor = Descriptor::deser(&described.descriptor())?;
        if !descriptor.matches(numeric_id, symbolic_id) {
            return Err(WireError::type_mismatch(symbolic_id, descriptor));
        }
        if !T::accepts(described.value().format_code()) {
            return Err(WireError::type_mismatch(
                symbolic_id,
                format!("{:?} body", described.value().format_code()),
            ));
        }
        Ok(())
    }

    pub fn numeric_id(&self) -> u64 {
        self.numeric_id
    }
    pub fn symbolic_id(&self) -> &'static str {
        self.symbolic_id
    }

    /// The full described encoding. Computed once and memoized when this
    /// was built from a value; decoded spans return their original
    /// bytes unchanged.
    pub fn bytes(&self) -> Result<&[u8], WireError> {
        match &self.repr {
            Repr::Span(view) => Ok(view.encoded_bytes()),
            Repr::Owned(bytes) => Ok(bytes),
            Repr::Value(value) => {
                if self.bytes.get().is_none() {
                    let mut buf = vec![];
                    self.ser_into(value, &mut buf)?;
                    let _ = self.bytes.set(buf);
                }
                Ok(self.bytes.get().unwrap())
            }
        }
    }

    fn ser_into<W: Write>(&self, value: &T, w: &mut W) -> Result<WriteLen, WireError> {
        let mut w_len = 0;
        w.write_all(&[FormatCode::Described as u8])?;
        w_len += 1;
        w_len += Descriptor::Numeric(self.numeric_id).ser(w)?.0;
        w_len += value.ser(w)?.0;
        Ok(WriteLen(w_len))
    }

    /// The underlying primitive value, decoded once and memoized.
    pub fn value(&self) -> Result<&T, WireError> {
        match &self.repr {
            Repr::Value(value) => Ok(value),
            Repr::Span(view) => {
                if self.value.get().is_none() {
                    let value = T::deser(&view.as_described()?.value())?;
                    let _ = self.value.set(value);
                }
                Ok(self.value.get().unwrap())
            }
            Repr::Owned(bytes) => {
                if self.value.get().is_none() {
                    let view = EncodedBuffer::new(bytes, 0)?;
                    let value = T::deser(&view.as_described()?.value())?;
                    let _ = self.value.set(value);
                }
                Ok(self.value.get().unwrap())
            }
        }
    }
}

impl<'a, T> Ser for DescribedEncoded<'a, T>
where
    T: Ser + Deser,
{
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        let bytes = self.bytes()?;
        w.write_all(bytes)?;
        Ok(WriteLen(bytes.len()))
    }
}
