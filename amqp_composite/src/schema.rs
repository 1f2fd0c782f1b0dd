use amqp_wire::serde::WireValue;

/// The primitive encoding a composite's fields travel in.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum CompositeForm {
    /// Fields keyed by position.
    List,
    /// Fields keyed by symbol.
    Map,
}

/// The value tag a field admits on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum WireTypeTag {
    Boolean,
    Uint,
    Ulong,
    Symbol,
    Binary,
    String,
    List,
    Map,
}

impl WireTypeTag {
    pub fn admits(self, value: &WireValue) -> bool {
        matches!(
            (self, value),
            (Self::Boolean, WireValue::Boolean(_))
                | (Self::Uint, WireValue::Uint(_))
                | (Self::Ulong, WireValue::Ulong(_))
                | (Self::Symbol, WireValue::Symbol(_))
                | (Self::Binary, WireValue::Binary(_))
                | (Self::String, WireValue::String(_))
                | (Self::List, WireValue::List(_))
                | (Self::Map, WireValue::Map(_))
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Uint => "uint",
            Self::Ulong => "ulong",
            Self::Symbol => "symbol",
            Self::Binary => "binary",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

/// One field of a composite schema. The slot index of a field is its
/// position in [`CompositeSchema::FIELDS`], for both wire forms.
#[derive(Clone, Copy, Debug)]
pub struct FieldDef {
    /// The symbol keying this field in the map form.
    pub key: &'static str,
    pub wire_type: WireTypeTag,
    /// A required field must be present (non-null) when decoding.
    pub required: bool,
}

/// Static description of one composite type: its descriptor ids, its
/// preferred wire form, and its field table.
///
/// Implementors are uninhabited marker types; all state lives in
/// [`CompositeBean`](crate::CompositeBean) and
/// [`CompositeBuffer`](crate::CompositeBuffer), which are generic over
/// the schema.
pub trait CompositeSchema {
    const SYMBOLIC_ID: &'static str;
    const CATEGORY: u32;
    const DESCRIPTOR_ID: u32;
    /// The ulong written as the numeric descriptor.
    const NUMERIC_ID: u64 = (Self::CATEGORY as u64) << 32 | Self::DESCRIPTOR_ID as u64;
    /// The form this codec encodes. Decoding accepts either form.
    const FORM: CompositeForm;
    const FIELDS: &'static [FieldDef];

    /// Slot index of the field with the given key, if the schema has one.
    fn field_index(key: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|f| f.key == key)
    }
}
