//! The `sasl-mechanisms` frame body: the mechanisms a server announces,
//! in its order of preference. List-encoded; the mechanism list is
//! required.

use crate::bean::CompositeBean;
use crate::buffer::CompositeBuffer;
use crate::schema::{CompositeForm, CompositeSchema, FieldDef, WireTypeTag};
use amqp_wire::serde::{MapValue, WireValue};
use amqp_wire::types::Symbol;
use amqp_wire::WireError;

pub enum SaslMechanisms {}

mod slot {
    pub const OPTIONS: usize = 0;
    pub const SASL_SERVER_MECHANISMS: usize = 1;
}

impl CompositeSchema for SaslMechanisms {
    const SYMBOLIC_ID: &'static str = "amqp:sasl-mechanisms:list";
    const CATEGORY: u32 = 2;
    const DESCRIPTOR_ID: u32 = 0x9801;
    const FORM: CompositeForm = CompositeForm::List;
    const FIELDS: &'static [FieldDef] = &[
        FieldDef { key: "options", wire_type: WireTypeTag::Map, required: false },
        FieldDef {
            key: "sasl-server-mechanisms",
            wire_type: WireTypeTag::List,
            required: true,
        },
    ];
}

pub type SaslMechanismsBean = CompositeBean<SaslMechanisms>;
pub type SaslMechanismsBuffer<'a> = CompositeBuffer<'a, SaslMechanisms>;

impl CompositeBean<SaslMechanisms> {
    pub fn options(&self) -> Option<&MapValue> {
        match self.get(slot::OPTIONS) {
            Some(WireValue::Map(m)) => Some(m),
            _ => None,
        }
    }
    pub fn set_options(&mut self, options: Option<MapValue>) {
        self.set(slot::OPTIONS, options.map(WireValue::Map));
    }

    /// The announced mechanisms, in wire order. Fails if an element of
    /// the list is not a symbol.
    pub fn sasl_server_mechanisms(&self) -> Result<Vec<Symbol>, WireError> {
        match self.get(slot::SASL_SERVER_MECHANISMS) {
            Some(WireValue::List(elements)) => {
                elements.iter().map(Symbol::try_from).collect()
            }
            _ => Ok(vec![]),
        }
    }
    pub fn set_sasl_server_mechanisms(&mut self, mechanisms: Vec<Symbol>) {
        let elements = mechanisms.into_iter().map(WireValue::from).collect();
        self.set(slot::SASL_SERVER_MECHANISMS, Some(WireValue::List(elements)));
    }
}
