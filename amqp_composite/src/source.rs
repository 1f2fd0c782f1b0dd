//! The `source` terminus composite: where a receiving link's messages
//! originate. Map-encoded; every field is optional.

use crate::bean::CompositeBean;
use crate::buffer::CompositeBuffer;
use crate::schema::{CompositeForm, CompositeSchema, FieldDef, WireTypeTag};
use amqp_wire::serde::{ListValue, MapValue, WireValue};
use amqp_wire::types::Address;

pub enum Source {}

mod slot {
    pub const ADDRESS: usize = 0;
    pub const CREATE: usize = 1;
    pub const TIMEOUT: usize = 2;
    pub const DISTRIBUTION_MODE: usize = 3;
    pub const FILTER: usize = 4;
    pub const MESSAGE_STATES: usize = 5;
    pub const ORPHAN_DISPOSITION: usize = 6;
}

impl CompositeSchema for Source {
    const SYMBOLIC_ID: &'static str = "amqp:source:map";
    const CATEGORY: u32 = 1;
    const DESCRIPTOR_ID: u32 = 38657;
    const FORM: CompositeForm = CompositeForm::Map;
    const FIELDS: &'static [FieldDef] = &[
        FieldDef { key: "address", wire_type: WireTypeTag::Binary, required: false },
        FieldDef { key: "create", wire_type: WireTypeTag::Boolean, required: false },
        FieldDef { key: "timeout", wire_type: WireTypeTag::Uint, required: false },
        FieldDef { key: "distribution-mode", wire_type: WireTypeTag::Uint, required: false },
        FieldDef { key: "filter", wire_type: WireTypeTag::Map, required: false },
        FieldDef { key: "message-states", wire_type: WireTypeTag::List, required: false },
        FieldDef { key: "orphan-disposition", wire_type: WireTypeTag::Map, required: false },
    ];
}

pub type SourceBean = CompositeBean<Source>;
pub type SourceBuffer<'a> = CompositeBuffer<'a, Source>;

impl CompositeBean<Source> {
    pub fn address(&self) -> Option<Address> {
        match self.get(slot::ADDRESS) {
            Some(WireValue::Binary(b)) => Some(Address(b.clone())),
            _ => None,
        }
    }
    pub fn set_address(&mut self, address: Option<Address>) {
        self.set(slot::ADDRESS, address.map(WireValue::from));
    }

    pub fn create(&self) -> Option<bool> {
        match self.get(slot::CREATE) {
            Some(WireValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }
    pub fn set_create(&mut self, create: Option<bool>) {
        self.set(slot::CREATE, create.map(WireValue::Boolean));
    }

    pub fn timeout(&self) -> Option<u32> {
        match self.get(slot::TIMEOUT) {
            Some(WireValue::Uint(v)) => Some(*v),
            _ => None,
        }
    }
    pub fn set_timeout(&mut self, timeout: Option<u32>) {
        self.set(slot::TIMEOUT, timeout.map(WireValue::Uint));
    }

    pub fn distribution_mode(&self) -> Option<u32> {
        match self.get(slot::DISTRIBUTION_MODE) {
            Some(WireValue::Uint(v)) => Some(*v),
            _ => None,
        }
    }
    pub fn set_distribution_mode(&mut self, mode: Option<u32>) {
        self.set(slot::DISTRIBUTION_MODE, mode.map(WireValue::Uint));
    }

    pub fn filter(&self) -> Option<&MapValue> {
        match self.get(slot::FILTER) {
            Some(WireValue::Map(m)) => Some(m),
            _ => None,
        }
    }
    pub fn set_filter(&mut self, filter: Option<MapValue>) {
        self.set(slot::FILTER, filter.map(WireValue::Map));
    }

    pub fn message_states(&self) -> Option<&ListValue> {
        match self.get(slot::MESSAGE_STATES) {
            Some(WireValue::List(l)) => Some(l),
            _ => None,
        }
    }
    pub fn set_message_states(&mut self, states: Option<ListValue>) {
        self.set(slot::MESSAGE_STATES, states.map(WireValue::List));
    }

    pub fn orphan_disposition(&self) -> Option<&MapValue> {
        match self.get(slot::ORPHAN_DISPOSITION) {
            Some(WireValue::Map(m)) => Some(m),
            _ => None,
        }
    }
    pub fn set_orphan_disposition(&mut self, disposition: Option<MapValue>) {
        self.set(slot::ORPHAN_DISPOSITION, disposition.map(WireValue::Map));
    }
}
