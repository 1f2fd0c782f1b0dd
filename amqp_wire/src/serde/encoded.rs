use crate::serde::{reader, Deser, EncodedBuffer, FormatCode, Ser};
use crate::WireError;
use std::any;
use std::io::Read;
use std::sync::OnceLock;

/// How an [`Encoded`] came to exist. Exactly one side is the source of
/// truth; the other side is derived lazily and memoized.
#[derive(Debug)]
enum Repr<'a, T> {
    /// Built from an in-memory value; bytes are derived on demand.
    Value(T),
    /// Built from a borrowed wire span; the value is derived on demand.
    Span(EncodedBuffer<'a>),
    /// Built from a byte-input source; owns its bytes.
    Owned(Vec<u8>),
    /// The AMQP null encoding: the semantic absence of a `T`.
    Null,
}

/// The encode/decode boundary for one value of type `T`.
///
/// Holds either a source value or an encoded buffer and lazily produces
/// the counterpart. Once a counterpart is memoized it is never
/// recomputed: callers holding a previous result keep observing the
/// same bytes/value. Decoding is a pure function of immutable backing
/// bytes, so concurrent first computations are harmless; the first
/// result to land in the cell wins and all callers read it.
#[derive(Debug)]
pub struct Encoded<'a, T> {
    repr: Repr<'a, T>,
    bytes: OnceLock<Vec<u8>>,
    value: OnceLock<T>,
}

impl<'a, T> Encoded<'a, T>
where
    T: Ser + Deser,
{
    pub fn from_value(value: T) -> Self {
        Self {
            repr: Repr::Value(value),
            bytes: OnceLock::new(),
            value: OnceLock::new(),
        }
    }

    /// Wraps an already-classified span. Fails with
    /// [`WireError::TypeMismatch`] if the span's format code is not one
    /// `T` decodes from; a null span is accepted as the absent value.
    pub fn from_buffer(view: EncodedBuffer<'a>) -> Result<Self, WireError> {
        if view.is_null() {
            return Ok(Self::null());
        }
        Self::check_accepts(view.format_code())?;
        Ok(Self {
            repr: Repr::Span(view),
            bytes: OnceLock::new(),
            value: OnceLock::new(),
        })
    }

    /// Reads exactly one encoded value from a byte-input source. The
    /// resulting `Encoded` owns its bytes.
    pub fn from_reader(r: &mut impl Read) -> Result<Encoded<'static, T>, WireError> {
        let bytes = reader::read_encoded(r)?;
        let view = EncodedBuffer::new(&bytes, 0)?;
        if view.is_null() {
            return Ok(Encoded::null());
        }
        Self::check_accepts(view.format_code())?;
        Ok(Encoded {
            repr: Repr::Owned(bytes),
            bytes: OnceLock::new(),
            value: OnceLock::new(),
        })
    }

    /// The absent value: `is_null()` holds and `value()` yields `None`.
    pub fn null() -> Self {
        Self {
            repr: Repr::Null,
            bytes: OnceLock::new(),
            value: OnceLock::new(),
        }
    }

    fn check_accepts(code: FormatCode) -> Result<(), WireError> {
        if !T::accepts(code) {
            return Err(WireError::type_mismatch(
                any::type_name::<T>(),
                format!("{code:?}"),
            ));
        }
        Ok(())
    }

    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    /// The encoded bytes, computed and memoized on first call when this
    /// was built from a value.
    pub fn bytes(&self) -> Result<&[u8], WireError> {
        match &self.repr {
            Repr::Span(view) => Ok(view.encoded_bytes()),
            Repr::Owned(bytes) => Ok(bytes),
            Repr::Value(value) => {
                if self.bytes.get().is_none() {
                    let buf = value.ser_solo()?;
                    let _ = self.bytes.set(buf);
                }
                Ok(self.bytes.get().unwrap())
            }
            Repr::Null => {
                if self.bytes.get().is_none() {
                    let _ = self.bytes.set(vec![FormatCode::Null as u8]);
                }
                Ok(self.bytes.get().unwrap())
            }
        }
    }

    /// The decoded value, computed and memoized on first call when this
    /// was built from wire bytes. `None` is the absent (null) value, not
    /// a sentinel `T`.
    pub fn value(&self) -> Result<Option<&T>, WireError> {
        match &self.repr {
            Repr::Null => Ok(None),
            Repr::Value(value) => Ok(Some(value)),
            Repr::Span(view) => {
                if self.value.get().is_none() {
                    let value = T::deser(view)?;
                    let _ = self.value.set(value);
                }
                Ok(self.value.get())
            }
            Repr::Owned(bytes) => {
                if self.value.get().is_none() {
                    let view = EncodedBuffer::new(bytes, 0)?;
                    let value = T::deser(&view)?;
                    let _ = self.value.set(value);
                }
                Ok(self.value.get())
            }
        }
    }
}
