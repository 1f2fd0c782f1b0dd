use crate::buffer::CompositeBuffer;
use crate::sasl::{SaslMechanisms, SaslMechanismsBuffer};
use crate::schema::CompositeSchema;
use crate::source::{Source, SourceBuffer};
use amqp_wire::serde::{try_read_encoded, Descriptor, EncodedBuffer, StreamRead};
use amqp_wire::WireError;
use std::io::Read;

/// One decoded composite, dispatched by descriptor.
pub enum DecodedComposite<'a> {
    Source(SourceBuffer<'a>),
    SaslMechanisms(SaslMechanismsBuffer<'a>),
}

impl<'a> DecodedComposite<'a> {
    pub fn symbolic_id(&self) -> &'static str {
        match self {
            Self::Source(_) => Source::SYMBOLIC_ID,
            Self::SaslMechanisms(_) => SaslMechanisms::SYMBOLIC_ID,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Source(buffer) => buffer.bytes(),
            Self::SaslMechanisms(buffer) => buffer.bytes(),
        }
    }
}

fn dispatch_descriptor(view: &EncodedBuffer<'_>) -> Result<Descriptor, WireError> {
    Descriptor::deser(&view.as_described()?.descriptor())
}

/// Decodes the composite a span points at, by its descriptor. A null
/// span is the absent composite; a descriptor naming no registered type
/// fails with [`WireError::TypeMismatch`].
pub fn decode_view(view: EncodedBuffer<'_>) -> Result<Option<DecodedComposite<'_>>, WireError> {
    if view.is_null() {
        return Ok(None);
    }
    let descriptor = dispatch_descriptor(&view)?;
    if descriptor.matches(Source::NUMERIC_ID, Source::SYMBOLIC_ID) {
        return Ok(CompositeBuffer::create(view)?.map(DecodedComposite::Source));
    }
    if descriptor.matches(SaslMechanisms::NUMERIC_ID, SaslMechanisms::SYMBOLIC_ID) {
        return Ok(CompositeBuffer::create(view)?.map(DecodedComposite::SaslMechanisms));
    }
    Err(WireError::type_mismatch(
        "a registered composite type",
        descriptor,
    ))
}

/// Decodes the composite at the start of a byte span.
pub fn decode(bytes: &[u8]) -> Result<Option<DecodedComposite<'_>>, WireError> {
    decode_view(EncodedBuffer::new(bytes, 0)?)
}

/// Reads one composite's bytes from a byte-input source and dispatches
/// it. A cleanly exhausted source yields [`StreamRead::Eof`]; a null
/// value in the stream is an error, since framing always carries a
/// body.
pub fn read_composite(
    r: &mut impl Read,
) -> Result<StreamRead<DecodedComposite<'static>>, WireError> {
    let bytes = match try_read_encoded(r)? {
        StreamRead::Eof => return Ok(StreamRead::Eof),
        StreamRead::Value(bytes) => bytes,
    };
    let view = EncodedBuffer::new(&bytes, 0)?;
    if view.is_null() {
        return Err(WireError::encoding("null where a composite is expected"));
    }
    let descriptor = dispatch_descriptor(&view)?;
    if descriptor.matches(Source::NUMERIC_ID, Source::SYMBOLIC_ID) {
        let buffer = CompositeBuffer::<Source>::from_owned(bytes)?;
        return Ok(StreamRead::Value(DecodedComposite::Source(buffer)));
    }
    if descriptor.matches(SaslMechanisms::NUMERIC_ID, SaslMechanisms::SYMBOLIC_ID) {
        let buffer = CompositeBuffer::<SaslMechanisms>::from_owned(bytes)?;
        return Ok(StreamRead::Value(DecodedComposite::SaslMechanisms(buffer)));
    }
    Err(WireError::type_mismatch(
        "a registered composite type",
        descriptor,
    ))
}
