use crate::serde::{Descriptor, FormatCode, WireValue, WriteLen};
use crate::WireError;
use std::io::Write;

impl WireValue {
    /// Length of this value's encoding, format code included. Kept in
    /// exact agreement with [`Self::ser`]: compound encodings derive
    /// their size fields from this before any byte is written.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Null | Self::Boolean(_) => 1,
            Self::Ubyte(_) => 2,
            Self::Ushort(_) => 3,
            Self::Uint(v) => match v {
                0 => 1,
                1..=255 => 2,
                _ => 5,
            },
            Self::Ulong(v) => match v {
                0 => 1,
                1..=255 => 2,
                _ => 9,
            },
            Self::Binary(b) => variable_len(b.len()),
            Self::String(s) => variable_len(s.len()),
            Self::Symbol(s) => variable_len(s.len()),
            Self::List(elements) => list_len(elements),
            Self::Map(entries) => map_len(entries),
            Self::Described(descriptor, value) => {
                1 + descriptor.encoded_len() + value.encoded_len()
            }
        }
    }

    /// Writes this value's encoding, choosing the most compact format
    /// code its payload admits.
    pub fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        let mut w_len = 0;
        match self {
            Self::Null => {
                put(w, &[FormatCode::Null as u8], &mut w_len)?;
            }
            Self::Boolean(true) => {
                put(w, &[FormatCode::BooleanTrue as u8], &mut w_len)?;
            }
            Self::Boolean(false) => {
                put(w, &[FormatCode::BooleanFalse as u8], &mut w_len)?;
            }
            Self::Ubyte(v) => {
                put(w, &[FormatCode::Ubyte as u8, *v], &mut w_len)?;
            }
            Self::Ushort(v) => {
                put(w, &[FormatCode::Ushort as u8], &mut w_len)?;
                put(w, &v.to_be_bytes(), &mut w_len)?;
            }
            Self::Uint(0) => {
                put(w, &[FormatCode::Uint0 as u8], &mut w_len)?;
            }
            Self::Uint(v @ 1..=255) => {
                put(w, &[FormatCode::SmallUint as u8, *v as u8], &mut w_len)?;
            }
            Self::Uint(v) => {
                put(w, &[FormatCode::Uint as u8], &mut w_len)?;
                put(w, &v.to_be_bytes(), &mut w_len)?;
            }
            Self::Ulong(0) => {
                put(w, &[FormatCode::Ulong0 as u8], &mut w_len)?;
            }
            Self::Ulong(v @ 1..=255) => {
                put(w, &[FormatCode::SmallUlong as u8, *v as u8], &mut w_len)?;
            }
            Self::Ulong(v) => {
                put(w, &[FormatCode::Ulong as u8], &mut w_len)?;
                put(w, &v.to_be_bytes(), &mut w_len)?;
            }
            Self::Binary(b) => {
                ser_variable(FormatCode::Vbin8, FormatCode::Vbin32, b, w, &mut w_len)?;
            }
            Self::String(s) => {
                ser_variable(
                    FormatCode::Str8,
                    FormatCode::Str32,
                    s.as_bytes(),
                    w,
                    &mut w_len,
                )?;
            }
            Self::Symbol(s) => {
                ser_variable(
                    FormatCode::Sym8,
                    FormatCode::Sym32,
                    s.as_bytes(),
                    w,
                    &mut w_len,
                )?;
            }
            Self::List(elements) => {
                w_len += ser_list(elements, w)?.0;
            }
            Self::Map(entries) => {
                w_len += ser_map(entries, w)?.0;
            }
            Self::Described(descriptor, value) => {
                put(w, &[FormatCode::Described as u8], &mut w_len)?;
                w_len += descriptor.ser(w)?.0;
                w_len += value.ser(w)?.0;
            }
        }
        Ok(WriteLen(w_len))
    }
}

impl Descriptor {
    pub fn encoded_len(&self) -> usize {
        match self {
            // The numeric form is never compacted: 0x80 plus the full
            // 8-byte id is the preamble external decoders depend on.
            Self::Numeric(_) => 9,
            Self::Symbol(s) => variable_len(s.len()),
        }
    }

    pub fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        let mut w_len = 0;
        match self {
            Self::Numeric(id) => {
                put(w, &[FormatCode::Ulong as u8], &mut w_len)?;
                put(w, &id.to_be_bytes(), &mut w_len)?;
            }
            Self::Symbol(s) => {
                ser_variable(FormatCode::Sym8, FormatCode::Sym32, s.as_bytes(), w, &mut w_len)?;
            }
        }
        Ok(WriteLen(w_len))
    }
}

fn put<W: Write>(w: &mut W, buf: &[u8], w_len: &mut usize) -> Result<(), WireError> {
    w.write_all(buf)?;
    *w_len += buf.len();
    Ok(())
}

fn variable_len(body_len: usize) -> usize {
    if body_len <= 255 {
        2 + body_len
    } else {
        5 + body_len
    }
}

fn ser_variable<W: Write>(
    code8: FormatCode,
    code32: FormatCode,
    body: &[u8],
    w: &mut W,
    w_len: &mut usize,
) -> Result<(), WireError> {
    if body.len() <= 255 {
        put(w, &[code8 as u8, body.len() as u8], w_len)?;
    } else {
        let size = u32::try_from(body.len())
            .map_err(|_| WireError::encoding(format!("body of {} bytes overflows u32", body.len())))?;
        put(w, &[code32 as u8], w_len)?;
        put(w, &size.to_be_bytes(), w_len)?;
    }
    put(w, body, w_len)
}

fn list_len(elements: &[WireValue]) -> usize {
    if elements.is_empty() {
        return 1;
    }
    let body_len: usize = elements.iter().map(WireValue::encoded_len).sum();
    compound_len(body_len, elements.len())
}

fn map_len(entries: &[(WireValue, WireValue)]) -> usize {
    let body_len: usize = entries
        .iter()
        .map(|(k, v)| k.encoded_len() + v.encoded_len())
        .sum();
    compound_len(body_len, entries.len() * 2)
}

/// `size` counts the count field plus the body, per the wire layout.
fn compound_len(body_len: usize, count: usize) -> usize {
    if body_len + 1 <= 255 && count <= 255 {
        1 + 1 + 1 + body_len
    } else {
        1 + 4 + 4 + body_len
    }
}

pub(crate) fn ser_list<W: Write>(
    elements: &[WireValue],
    w: &mut W,
) -> Result<WriteLen, WireError> {
    let mut w_len = 0;
    if elements.is_empty() {
        put(w, &[FormatCode::List0 as u8], &mut w_len)?;
        return Ok(WriteLen(w_len));
    }
    let body_len: usize = elements.iter().map(WireValue::encoded_len).sum();
    ser_compound_header(
        FormatCode::List8,
        FormatCode::List32,
        body_len,
        elements.len(),
        w,
        &mut w_len,
    )?;
    for element in elements {
        w_len += element.ser(w)?.0;
    }
    Ok(WriteLen(w_len))
}

pub(crate) fn ser_map<W: Write>(
    entries: &[(WireValue, WireValue)],
    w: &mut W,
) -> Result<WriteLen, WireError> {
    let mut w_len = 0;
    let body_len: usize = entries
        .iter()
        .map(|(k, v)| k.encoded_len() + v.encoded_len())
        .sum();
    ser_compound_header(
        FormatCode::Map8,
        FormatCode::Map32,
        body_len,
        entries.len() * 2,
        w,
        &mut w_len,
    )?;
    for (key, value) in entries {
        w_len += key.ser(w)?.0;
        w_len += value.ser(w)?.0;
    }
    Ok(WriteLen(w_len))
}

fn ser_compound_header<W: Write>(
    code8: FormatCode,
    code32: FormatCode,
    body_len: usize,
    count: usize,
    w: &mut W,
    w_len: &mut usize,
) -> Result<(), WireError> {
    if body_len + 1 <= 255 && count <= 255 {
        put(
            w,
            &[code8 as u8, (body_len + 1) as u8, count as u8],
            w_len,
        )?;
    } else {
        let size = u32::try_from(body_len + 4)
            .map_err(|_| WireError::encoding(format!("body of {body_len} bytes overflows u32")))?;
        let count = u32::try_from(count)
            .map_err(|_| WireError::encoding(format!("count {count} overflows u32")))?;
        put(w, &[code32 as u8], w_len)?;
        put(w, &size.to_be_bytes(), w_len)?;
        put(w, &count.to_be_bytes(), w_len)?;
    }
    Ok(())
}
