use crate::serde::{
    Descriptor, EncodedBuffer, FormatCategory, FormatCode, FormatCodeByte, SizeWidth, WireValue,
};
use crate::WireError;

impl WireValue {
    /// Decodes the value a view points at, recursing into compound
    /// encodings. Accepts every format code in the table; the compact and
    /// full widths of the same type decode to the same tag.
    pub fn deser(view: &EncodedBuffer<'_>) -> Result<Self, WireError> {
        let data = view.data_bytes();
        let value = match view.format_code() {
            FormatCode::Null => Self::Null,
            FormatCode::Described => {
                let described = view.as_described()?;
                let descriptor = Descriptor::deser(&described.descriptor())?;
                let value = Self::deser(&described.value())?;
                Self::Described(descriptor, Box::new(value))
            }
            FormatCode::List0 | FormatCode::List8 | FormatCode::List32 => {
                let elements = view
                    .list_elements()?
                    .map(|element| Self::deser(&element?))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::List(elements)
            }
            FormatCode::Map8 | FormatCode::Map32 => {
                let entries = view
                    .map_entries()?
                    .map(|entry| {
                        let (key, value) = entry?;
                        Ok((Self::deser(&key)?, Self::deser(&value)?))
                    })
                    .collect::<Result<Vec<_>, WireError>>()?;
                Self::Map(entries)
            }
            FormatCode::Array8 | FormatCode::Array32 => deser_array(view)?,
            code => match code.category() {
                FormatCategory::Fixed(_) => fixed_value(code, data)?,
                FormatCategory::Variable(_) => variable_value(code, data)?,
                _ => unreachable!("{code:?} handled above"),
            },
        };
        Ok(value)
    }
}

impl Descriptor {
    pub fn deser(view: &EncodedBuffer<'_>) -> Result<Self, WireError> {
        let code = view.format_code();
        if code.is_ulong() {
            match fixed_value(code, view.data_bytes())? {
                WireValue::Ulong(id) => Ok(Self::Numeric(id)),
                other => Err(WireError::type_mismatch("ulong descriptor", other.tag_name())),
            }
        } else if code.is_symbol() {
            Ok(Self::Symbol(utf8(view.data_bytes(), "symbolic descriptor")?))
        } else {
            Err(WireError::type_mismatch(
                "descriptor (ulong or symbol)",
                format!("{code:?}"),
            ))
        }
    }
}

/// Decodes one fixed-width scalar from its body bytes.
fn fixed_value(code: FormatCode, body: &[u8]) -> Result<WireValue, WireError> {
    let value = match code {
        FormatCode::BooleanTrue => WireValue::Boolean(true),
        FormatCode::BooleanFalse => WireValue::Boolean(false),
        FormatCode::BooleanByte => match body[0] {
            0 => WireValue::Boolean(false),
            1 => WireValue::Boolean(true),
            other => {
                return Err(WireError::encoding(format!(
                    "boolean body byte {other:#04x}"
                )))
            }
        },
        FormatCode::Ubyte => WireValue::Ubyte(body[0]),
        FormatCode::Ushort => WireValue::Ushort(u16::from_be_bytes(body.try_into().unwrap())),
        FormatCode::Uint0 => WireValue::Uint(0),
        FormatCode::SmallUint => WireValue::Uint(body[0] as u32),
        FormatCode::Uint => WireValue::Uint(u32::from_be_bytes(body.try_into().unwrap())),
        FormatCode::Ulong0 => WireValue::Ulong(0),
        FormatCode::SmallUlong => WireValue::Ulong(body[0] as u64),
        FormatCode::Ulong => WireValue::Ulong(u64::from_be_bytes(body.try_into().unwrap())),
        other => {
            return Err(WireError::type_mismatch(
                "fixed-width scalar",
                format!("{other:?}"),
            ))
        }
    };
    Ok(value)
}

/// Decodes one variable-width value from its body bytes.
fn variable_value(code: FormatCode, body: &[u8]) -> Result<WireValue, WireError> {
    let value = match code {
        FormatCode::Vbin8 | FormatCode::Vbin32 => WireValue::Binary(body.to_vec()),
        FormatCode::Str8 | FormatCode::Str32 => WireValue::String(utf8(body, "string")?),
        FormatCode::Sym8 | FormatCode::Sym32 => WireValue::Symbol(utf8(body, "symbol")?),
        other => {
            return Err(WireError::type_mismatch(
                "variable-width value",
                format!("{other:?}"),
            ))
        }
    };
    Ok(value)
}

/// An array body carries one element constructor followed by `count`
/// bodies encoded without their own format codes. Arrays decode to the
/// list tag; the codec never emits them.
fn deser_array(view: &EncodedBuffer<'_>) -> Result<WireValue, WireError> {
    let count = view.raw_count();
    if count == 0 {
        return Ok(WireValue::List(vec![]));
    }
    let data = view.data_bytes();
    let element_code_byte = *data.first().ok_or(WireError::Truncated {
        needed: 1,
        available: 0,
    })?;
    let element_code = FormatCode::try_from(FormatCodeByte::from(element_code_byte))?;

    let mut elements = Vec::with_capacity(count);
    let mut cursor = 1;
    for _ in 0..count {
        let (element_len, element) = deser_array_element(element_code, &data[cursor..])?;
        cursor += element_len;
        elements.push(element);
    }
    Ok(WireValue::List(elements))
}

fn deser_array_element(
    code: FormatCode,
    chunk: &[u8],
) -> Result<(usize, WireValue), WireError> {
    match code.category() {
        FormatCategory::Null => Ok((0, WireValue::Null)),
        FormatCategory::Fixed(body_len) => {
            if chunk.len() < body_len {
                return Err(WireError::Truncated {
                    needed: body_len,
                    available: chunk.len(),
                });
            }
            Ok((body_len, fixed_value(code, &chunk[..body_len])?))
        }
        FormatCategory::Variable(width) => {
            let field_len = width.field_len();
            if chunk.len() < field_len {
                return Err(WireError::Truncated {
                    needed: field_len,
                    available: chunk.len(),
                });
            }
            let size = match width {
                SizeWidth::One => chunk[0] as usize,
                SizeWidth::Four => {
                    u32::from_be_bytes(chunk[..4].try_into().unwrap()) as usize
                }
                SizeWidth::Zero => 0,
            };
            let end = field_len + size;
            if chunk.len() < end {
                return Err(WireError::Truncated {
                    needed: end,
                    available: chunk.len(),
                });
            }
            Ok((end, variable_value(code, &chunk[field_len..end])?))
        }
        _ => Err(WireError::encoding(format!(
            "array of {code:?} elements is not supported"
        ))),
    }
}

fn utf8(body: &[u8], what: &str) -> Result<String, WireError> {
    String::from_utf8(body.to_vec())
        .map_err(|e| WireError::encoding(format!("invalid utf-8 in {what}: {e}")))
}
