use crate::serde::{FormatCategory, FormatCode, FormatCodeByte, SizeWidth};
use crate::WireError;
use std::io::{ErrorKind, Read};

/// Outcome of reading from a byte-input source that may be cleanly
/// exhausted.
#[derive(PartialEq, Eq, Debug)]
pub enum StreamRead<T> {
    /// The source held no further value.
    Eof,
    Value(T),
}

/// Reads exactly the bytes of one encoded value from a byte-input
/// source: the format code, any size/count fields, and the body, with a
/// described value's descriptor and value read recursively. Nothing past
/// the value is consumed.
pub fn read_encoded(r: &mut impl Read) -> Result<Vec<u8>, WireError> {
    match try_read_encoded(r)? {
        StreamRead::Eof => Err(WireError::encoding("no data where a value is expected")),
        StreamRead::Value(bytes) => Ok(bytes),
    }
}

/// Like [`read_encoded`], but a source exhausted before the first byte
/// yields [`StreamRead::Eof`] instead of an error.
pub fn try_read_encoded(r: &mut impl Read) -> Result<StreamRead<Vec<u8>>, WireError> {
    let mut out = Vec::new();
    let mut first = [0u8; 1];
    match r.read_exact(&mut first) {
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(StreamRead::Eof),
        Err(e) => return Err(e.into()),
        Ok(()) => {}
    }
    out.push(first[0]);
    read_rest(r, first[0], &mut out)?;
    Ok(StreamRead::Value(out))
}

/// Reads everything following an already-consumed format code.
fn read_rest(r: &mut impl Read, code_byte: u8, out: &mut Vec<u8>) -> Result<(), WireError> {
    let code = FormatCode::try_from(FormatCodeByte::from(code_byte))?;
    match code.category() {
        FormatCategory::Null => {}
        FormatCategory::Fixed(body_len) => {
            read_exact_into(r, body_len, out)?;
        }
        FormatCategory::Variable(width)
        | FormatCategory::List(width)
        | FormatCategory::Map(width)
        | FormatCategory::Array(width) => {
            let field_len = width.field_len();
            if field_len > 0 {
                let size_at = out.len();
                read_exact_into(r, field_len, out)?;
                let size = match width {
                    SizeWidth::One => out[size_at] as usize,
                    SizeWidth::Four => {
                        u32::from_be_bytes(out[size_at..size_at + 4].try_into().unwrap()) as usize
                    }
                    SizeWidth::Zero => 0,
                };
                read_exact_into(r, size, out)?;
            }
        }
        FormatCategory::Described => {
            let mut next = [0u8; 1];
            r.read_exact(&mut next)?;
            out.push(next[0]);
            read_rest(r, next[0], out)?;

            r.read_exact(&mut next)?;
            out.push(next[0]);
            read_rest(r, next[0], out)?;
        }
    }
    Ok(())
}

fn read_exact_into(r: &mut impl Read, n: usize, out: &mut Vec<u8>) -> Result<(), WireError> {
    let start = out.len();
    out.resize(start + n, 0);
    r.read_exact(&mut out[start..])?;
    Ok(())
}
