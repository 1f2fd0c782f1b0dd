use crate::serde::{FormatCategory, FormatCode, FormatCodeByte, SizeWidth};
use crate::WireError;

/// A lazy view over one already-encoded value inside a borrowed span.
///
/// Construction parses only the header: the format code, the size/count
/// fields, and (for a described value) the nested headers needed to find
/// where the value ends. Element payloads are never decoded; callers pull
/// sub-views out with [`Self::as_described`], [`Self::list_elements`] or
/// [`Self::map_entries`] and decode only what they need.
///
/// The view borrows the caller's storage. It cannot outlive the caller's
/// buffer, which keeps the codec from retaining spans past the point the
/// transport reuses them.
#[derive(Clone, Copy, Debug)]
pub struct EncodedBuffer<'a> {
    bytes: &'a [u8],
    offset: usize,
    code: FormatCode,
    /// Absolute offset of the body, past any size/count fields.
    data_offset: usize,
    /// Body length in bytes, excluding the count field.
    data_len: usize,
    /// Raw element count. For maps this counts keys and values.
    count: usize,
    /// Whole-encoding length, format code included.
    total_len: usize,
}

fn read_size(bytes: &[u8], at: usize, width: SizeWidth) -> Result<usize, WireError> {
    let field_len = width.field_len();
    let end = at + field_len;
    if bytes.len() < end {
        return Err(WireError::Truncated {
            needed: end,
            available: bytes.len(),
        });
    }
    let size = match width {
        SizeWidth::Zero => 0,
        SizeWidth::One => bytes[at] as usize,
        SizeWidth::Four => u32::from_be_bytes(bytes[at..end].try_into().unwrap()) as usize,
    };
    Ok(size)
}

impl<'a> EncodedBuffer<'a> {
    pub fn new(bytes: &'a [u8], offset: usize) -> Result<Self, WireError> {
        let code_byte = *bytes.get(offset).ok_or(WireError::Truncated {
            needed: offset + 1,
            available: bytes.len(),
        })?;
        let code = FormatCode::try_from(FormatCodeByte::from(code_byte))?;

        let (data_offset, data_len, count) = match code.category() {
            FormatCategory::Null => (offset + 1, 0, 0),
            FormatCategory::Fixed(body_len) => {
                Self::need(bytes, offset + 1 + body_len)?;
                (offset + 1, body_len, 0)
            }
            FormatCategory::Variable(width) => {
                let field_len = width.field_len();
                let size = read_size(bytes, offset + 1, width)?;
                Self::need(bytes, offset + 1 + field_len + size)?;
                (offset + 1 + field_len, size, 0)
            }
            FormatCategory::List(width)
            | FormatCategory::Map(width)
            | FormatCategory::Array(width) => {
                let field_len = width.field_len();
                if field_len == 0 {
                    // list0: complete with its format code.
                    (offset + 1, 0, 0)
                } else {
                    let size = read_size(bytes, offset + 1, width)?;
                    if size < field_len {
                        return Err(WireError::encoding(format!(
                            "compound size {size} smaller than its count field ({field_len} bytes)"
                        )));
                    }
                    let count = read_size(bytes, offset + 1 + field_len, width)?;
                    Self::need(bytes, offset + 1 + field_len + size)?;
                    (
                        offset + 1 + field_len + field_len,
                        size - field_len,
                        count,
                    )
                }
            }
            FormatCategory::Described => {
                let descriptor = Self::new(bytes, offset + 1)?;
                let value = Self::new(bytes, offset + 1 + descriptor.total_len)?;
                let total_len = 1 + descriptor.total_len + value.total_len;
                return Ok(Self {
                    bytes,
                    offset,
                    code,
                    data_offset: offset + 1,
                    data_len: total_len - 1,
                    count: 0,
                    total_len,
                });
            }
        };

        Ok(Self {
            bytes,
            offset,
            code,
            data_offset,
            data_len,
            count,
            total_len: (data_offset - offset) + data_len,
        })
    }

    fn need(bytes: &[u8], end: usize) -> Result<(), WireError> {
        if bytes.len() < end {
            return Err(WireError::Truncated {
                needed: end,
                available: bytes.len(),
            });
        }
        Ok(())
    }

    pub fn format_code(&self) -> FormatCode {
        self.code
    }
    pub fn category(&self) -> FormatCategory {
        self.code.category()
    }
    pub fn is_null(&self) -> bool {
        self.code == FormatCode::Null
    }

    /// Whole-encoding length in bytes, format code included.
    pub fn encoded_len(&self) -> usize {
        self.total_len
    }
    /// The whole encoding, format code included.
    pub fn encoded_bytes(&self) -> &'a [u8] {
        &self.bytes[self.offset..self.offset + self.total_len]
    }
    /// The body, past the size/count fields.
    pub fn data_bytes(&self) -> &'a [u8] {
        &self.bytes[self.data_offset..self.data_offset + self.data_len]
    }
    /// Raw element count of a compound encoding. Maps count keys and
    /// values separately.
    pub fn raw_count(&self) -> usize {
        self.count
    }

    /// Splits a described encoding into its descriptor and value views.
    pub fn as_described(&self) -> Result<DescribedView<'a>, WireError> {
        if self.code != FormatCode::Described {
            return Err(WireError::type_mismatch(
                "described value",
                format!("{:?}", self.code),
            ));
        }
        let descriptor = Self::new(self.bytes, self.offset + 1)?;
        let value = Self::new(self.bytes, self.offset + 1 + descriptor.total_len)?;
        Ok(DescribedView { descriptor, value })
    }

    /// Sub-views over a list's elements, produced without decoding any
    /// element payload.
    pub fn list_elements(&self) -> Result<ElementIter<'a>, WireError> {
        if !self.code.is_list() {
            return Err(WireError::type_mismatch(
                "list",
                format!("{:?}", self.code),
            ));
        }
        Ok(ElementIter {
            bytes: self.bytes,
            cursor: self.data_offset,
            region_end: self.data_offset + self.data_len,
            remaining: self.count,
        })
    }

    /// Sub-view pairs over a map's entries.
    pub fn map_entries(&self) -> Result<MapEntryIter<'a>, WireError> {
        if !self.code.is_map() {
            return Err(WireError::type_mismatch("map", format!("{:?}", self.code)));
        }
        if self.count % 2 != 0 {
            return Err(WireError::encoding(format!(
                "map count {} is odd",
                self.count
            )));
        }
        Ok(MapEntryIter {
            elements: ElementIter {
                bytes: self.bytes,
                cursor: self.data_offset,
                region_end: self.data_offset + self.data_len,
                remaining: self.count,
            },
        })
    }
}

/// Descriptor and value views of one described encoding.
#[derive(Clone, Copy, Debug)]
pub struct DescribedView<'a> {
    descriptor: EncodedBuffer<'a>,
    value: EncodedBuffer<'a>,
}
impl<'a> DescribedView<'a> {
    pub fn descriptor(&self) -> EncodedBuffer<'a> {
        self.descriptor
    }
    pub fn value(&self) -> EncodedBuffer<'a> {
        self.value
    }
}

/// Lazy iterator over a compound encoding's element spans. Each `next`
/// parses one element header; payloads stay untouched.
#[derive(Debug)]
pub struct ElementIter<'a> {
    bytes: &'a [u8],
    cursor: usize,
    region_end: usize,
    remaining: usize,
}
impl<'a> Iterator for ElementIter<'a> {
    type Item = Result<EncodedBuffer<'a>, WireError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let element = match EncodedBuffer::new(self.bytes, self.cursor) {
            Err(e) => return Some(Err(e)),
            Ok(element) => element,
        };
        self.cursor += element.encoded_len();
        if self.cursor > self.region_end {
            return Some(Err(WireError::Truncated {
                needed: self.cursor,
                available: self.region_end,
            }));
        }
        Some(Ok(element))
    }
}

/// Lazy iterator over a map's (key, value) spans.
#[derive(Debug)]
pub struct MapEntryIter<'a> {
    elements: ElementIter<'a>,
}
impl<'a> Iterator for MapEntryIter<'a> {
    type Item = Result<(EncodedBuffer<'a>, EncodedBuffer<'a>), WireError>;
    fn next(&mut self) -> Option<Self::Item> {
        let key = match self.elements.next()? {
            Err(e) => return Some(Err(e)),
            Ok(key) => key,
        };
        let value = match self.elements.next() {
            None => {
                return Some(Err(WireError::encoding(
                    "map key without a value".to_string(),
                )))
            }
            Some(Err(e)) => return Some(Err(e)),
            Some(Ok(value)) => value,
        };
        Some(Ok((key, value)))
    }
}
