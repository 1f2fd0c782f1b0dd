use std::fmt;

pub(crate) mod deser;
pub(crate) mod ser;

/// One decoded AMQP value. The tag fully determines both the decode and
/// the encode routine; there is no implicit coercion between tags.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum WireValue {
    Null,
    Boolean(bool),
    Ubyte(u8),
    Ushort(u16),
    Uint(u32),
    Ulong(u64),
    /// Interned protocol string (field keys, mechanism names, ...).
    Symbol(String),
    Binary(Vec<u8>),
    String(String),
    List(Vec<WireValue>),
    /// Entries in wire order. Decode preserves insertion order; encode
    /// writes entries back in the same order.
    Map(Vec<(WireValue, WireValue)>),
    Described(Descriptor, Box<WireValue>),
}

impl WireValue {
    /// Short tag name, for diagnostics.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Ubyte(_) => "ubyte",
            Self::Ushort(_) => "ushort",
            Self::Uint(_) => "uint",
            Self::Ulong(_) => "ulong",
            Self::Symbol(_) => "symbol",
            Self::Binary(_) => "binary",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Described(_, _) => "described",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Identifies which composite schema a described value carries.
///
/// The wire form is either the numeric id (a ulong holding
/// `category << 32 | descriptor_id`) or the symbolic name. A composite
/// type matches a descriptor if it equals *either* form.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum Descriptor {
    Numeric(u64),
    Symbol(String),
}

impl Descriptor {
    pub fn from_parts(category: u32, descriptor_id: u32) -> Self {
        Self::Numeric((category as u64) << 32 | descriptor_id as u64)
    }

    /// Whether this wire descriptor names the type registered under the
    /// given ids. Either representation matches; never both required.
    pub fn matches(&self, numeric_id: u64, symbolic_id: &str) -> bool {
        match self {
            Self::Numeric(id) => *id == numeric_id,
            Self::Symbol(name) => name == symbolic_id,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{:#010x}:{:#010x}", id >> 32, id & 0xffff_ffff),
            Self::Symbol(name) => write!(f, "{name}"),
        }
    }
}

/// Ordered list body of a composite value.
pub type ListValue = Vec<WireValue>;
/// Ordered map body of a composite value.
pub type MapValue = Vec<(WireValue, WireValue)>;
