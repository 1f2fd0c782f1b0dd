use crate::bean::CompositeBean;
use crate::decode;
use crate::schema::CompositeSchema;
use amqp_wire::serde::{read_encoded, Descriptor, EncodedBuffer, Ser, WriteLen};
use amqp_wire::WireError;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::sync::OnceLock;

/// The immutable, wire side of a composite value: verified bytes plus a
/// lazily decoded bean.
///
/// Construction verifies the descriptor (either id form) and that the
/// body is a list or map; the fields themselves stay undecoded until a
/// caller asks for the bean. The memoized bean is shared: repeated
/// [`Self::bean`] calls return the same decode, and [`Self::to_mutable`]
/// hands out copy-on-write copies of it.
pub struct CompositeBuffer<'a, S> {
    repr: Repr<'a>,
    bean: OnceLock<CompositeBean<S>>,
    schema: PhantomData<S>,
}

enum Repr<'a> {
    Span(EncodedBuffer<'a>),
    Owned(Vec<u8>),
}

impl<'a, S: CompositeSchema> CompositeBuffer<'a, S> {
    /// Wraps a described span, verifying it names this schema. A null
    /// span is the absent composite, not an error.
    pub fn create(view: EncodedBuffer<'a>) -> Result<Option<Self>, WireError> {
        if view.is_null() {
            return Ok(None);
        }
        Self::verify(&view)?;
        Ok(Some(Self {
            repr: Repr::Span(view),
            bean: OnceLock::new(),
            schema: PhantomData,
        }))
    }

    /// Takes ownership of one composite's bytes, verifying eagerly.
    pub fn from_owned(bytes: Vec<u8>) -> Result<CompositeBuffer<'static, S>, WireError> {
        let view = EncodedBuffer::new(&bytes, 0)?;
        Self::verify(&view)?;
        Ok(CompositeBuffer {
            repr: Repr::Owned(bytes),
            bean: OnceLock::new(),
            schema: PhantomData,
        })
    }

    /// Reads exactly one encoded value from a byte-input source.
    pub fn from_reader(r: &mut impl Read) -> Result<CompositeBuffer<'static, S>, WireError> {
        Self::from_owned(read_encoded(r)?)
    }

    fn verify(view: &EncodedBuffer<'_>) -> Result<(), WireError> {
        let described = view.as_described()?;
        let descriptor = Descriptor::deser(&described.descriptor())?;
        if !descriptor.matches(S::NUMERIC_ID, S::SYMBOLIC_ID) {
            return Err(WireError::type_mismatch(S::SYMBOLIC_ID, descriptor));
        }
        let body_code = described.value().format_code();
        if !body_code.is_list() && !body_code.is_map() {
            return Err(WireError::type_mismatch(
                S::SYMBOLIC_ID,
                format!("{body_code:?} body"),
            ));
        }
        Ok(())
    }

    /// The full described encoding, as received.
    pub fn bytes(&self) -> &[u8] {
        match &self.repr {
            Repr::Span(view) => view.encoded_bytes(),
            Repr::Owned(bytes) => bytes,
        }
    }

    /// The decoded fields, computed once and memoized. Schema
    /// violations in the body surface here, not at construction.
    pub fn bean(&self) -> Result<&CompositeBean<S>, WireError> {
        if self.bean.get().is_none() {
            let view = match &self.repr {
                Repr::Span(view) => *view,
                Repr::Owned(bytes) => EncodedBuffer::new(bytes, 0)?,
            };
            let body = view.as_described()?.value();
            let fields = decode::decode_fields::<S>(&body)?;
            let _ = self.bean.set(CompositeBean::from_fields(fields));
        }
        Ok(self.bean.get().unwrap())
    }

    /// A mutable copy of the decoded bean. The buffer itself stays
    /// immutable; re-encode the copy to get updated bytes.
    pub fn to_mutable(&self) -> Result<CompositeBean<S>, WireError> {
        Ok(self.bean()?.copy())
    }
}

impl<'a, S: CompositeSchema> Ser for CompositeBuffer<'a, S> {
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        let bytes = self.bytes();
        w.write_all(bytes)?;
        Ok(WriteLen::new_manual(bytes.len()))
    }
}
