use crate::WireError;
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::io::{self, Read};
use std::mem;

#[derive(From, Deref, Clone, Copy)]
pub struct FormatCodeByte(u8);
impl From<FormatCode> for FormatCodeByte {
    fn from(code: FormatCode) -> Self {
        let int = code.to_u8().unwrap();
        Self(int)
    }
}
impl FormatCodeByte {
    pub fn deser(r: &mut impl Read) -> Result<(usize, Self), io::Error> {
        let mut buf = [0u8; mem::size_of::<u8>()];
        r.read_exact(&mut buf)?;
        Ok((buf.len(), Self(buf[0])))
    }
}

/// The format codes this codec emits and accepts.
///
/// We map enum members to wire bytes manually because the AMQP 1.0
/// registry assigns a meaningful value to each code: the high nibble is
/// the category (fixed width, variable width, compound, ...) and the low
/// nibble distinguishes codes within the category. An automatic
/// discriminant would lose that correspondence.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum FormatCode {
    Described = 0x00,
    Null = 0x40,
    BooleanTrue = 0x41,
    BooleanFalse = 0x42,
    Uint0 = 0x43,
    Ulong0 = 0x44,
    List0 = 0x45,
    Ubyte = 0x50,
    SmallUint = 0x52,
    SmallUlong = 0x53,
    BooleanByte = 0x56,
    Ushort = 0x60,
    Uint = 0x70,
    Ulong = 0x80,
    Vbin8 = 0xa0,
    Str8 = 0xa1,
    Sym8 = 0xa3,
    Vbin32 = 0xb0,
    Str32 = 0xb1,
    Sym32 = 0xb3,
    List8 = 0xc0,
    Map8 = 0xc1,
    List32 = 0xd0,
    Map32 = 0xd1,
    Array8 = 0xe0,
    Array32 = 0xf0,
}

impl TryFrom<FormatCodeByte> for FormatCode {
    type Error = WireError;
    fn try_from(int: FormatCodeByte) -> Result<Self, WireError> {
        FormatCode::from_u8(int.0).ok_or(WireError::UnknownFormatCode { code: int.0 })
    }
}

/// Width of a size/count header field.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SizeWidth {
    /// No field at all; the value is complete with its format code.
    Zero,
    One,
    Four,
}
impl SizeWidth {
    pub fn field_len(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Four => 4,
        }
    }
}

/// What follows a format code on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum FormatCategory {
    Null,
    /// A body of exactly this many bytes.
    Fixed(usize),
    /// A size field, then that many body bytes.
    Variable(SizeWidth),
    List(SizeWidth),
    Map(SizeWidth),
    Array(SizeWidth),
    /// A descriptor value, then the described value.
    Described,
}

impl FormatCategory {
    /// Classifies a raw format-code byte. Total over the byte space:
    /// every byte either maps to a category or fails with
    /// [`WireError::UnknownFormatCode`].
    pub fn classify(code: u8) -> Result<Self, WireError> {
        let code = FormatCode::try_from(FormatCodeByte::from(code))?;
        Ok(code.category())
    }
}

impl FormatCode {
    pub fn category(self) -> FormatCategory {
        match self {
            Self::Described => FormatCategory::Described,
            Self::Null => FormatCategory::Null,
            Self::BooleanTrue | Self::BooleanFalse | Self::Uint0 | Self::Ulong0 => {
                FormatCategory::Fixed(0)
            }
            Self::Ubyte | Self::SmallUint | Self::SmallUlong | Self::BooleanByte => {
                FormatCategory::Fixed(1)
            }
            Self::Ushort => FormatCategory::Fixed(2),
            Self::Uint => FormatCategory::Fixed(4),
            Self::Ulong => FormatCategory::Fixed(8),
            Self::Vbin8 | Self::Str8 | Self::Sym8 => FormatCategory::Variable(SizeWidth::One),
            Self::Vbin32 | Self::Str32 | Self::Sym32 => FormatCategory::Variable(SizeWidth::Four),
            Self::List0 => FormatCategory::List(SizeWidth::Zero),
            Self::List8 => FormatCategory::List(SizeWidth::One),
            Self::List32 => FormatCategory::List(SizeWidth::Four),
            Self::Map8 => FormatCategory::Map(SizeWidth::One),
            Self::Map32 => FormatCategory::Map(SizeWidth::Four),
            Self::Array8 => FormatCategory::Array(SizeWidth::One),
            Self::Array32 => FormatCategory::Array(SizeWidth::Four),
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self.category(), FormatCategory::List(_))
    }
    pub fn is_map(self) -> bool {
        matches!(self.category(), FormatCategory::Map(_))
    }
    pub fn is_symbol(self) -> bool {
        matches!(self, Self::Sym8 | Self::Sym32)
    }
    pub fn is_ulong(self) -> bool {
        matches!(self, Self::Ulong | Self::SmallUlong | Self::Ulong0)
    }
}
