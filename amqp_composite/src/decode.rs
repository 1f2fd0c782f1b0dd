use crate::schema::CompositeSchema;
use amqp_wire::serde::{EncodedBuffer, WireValue};
use amqp_wire::WireError;
use itertools::Itertools;
use std::marker::PhantomData;

/// Visitor over a map-encoded composite body. The driver walks the
/// entries in wire order; the visitor owns all per-entry decisions.
pub trait MapDecoder {
    type Container;

    fn create_container(&self, entry_count: usize) -> Self::Container;

    fn decode_entry(
        &self,
        key: &EncodedBuffer<'_>,
        value: &EncodedBuffer<'_>,
        container: &mut Self::Container,
    ) -> Result<(), WireError>;
}

/// Visitor over a list-encoded composite body.
pub trait ListDecoder {
    type Container;

    fn create_container(&self, element_count: usize) -> Self::Container;

    fn decode_element(
        &self,
        index: usize,
        element: &EncodedBuffer<'_>,
        container: &mut Self::Container,
    ) -> Result<(), WireError>;
}

pub fn decode_map<D: MapDecoder>(
    decoder: &D,
    body: &EncodedBuffer<'_>,
) -> Result<D::Container, WireError> {
    let mut container = decoder.create_container(body.raw_count() / 2);
    for entry in body.map_entries()? {
        let (key, value) = entry?;
        decoder.decode_entry(&key, &value, &mut container)?;
    }
    Ok(container)
}

pub fn decode_list<D: ListDecoder>(
    decoder: &D,
    body: &EncodedBuffer<'_>,
) -> Result<D::Container, WireError> {
    let mut container = decoder.create_container(body.raw_count());
    for (index, element) in body.list_elements()?.enumerate() {
        decoder.decode_element(index, &element?, &mut container)?;
    }
    Ok(container)
}

/// The schema-driven visitor: decodes either body form of `S` into the
/// field slots of a bean.
pub(crate) struct SchemaDecoder<S>(PhantomData<S>);

impl<S: CompositeSchema> SchemaDecoder<S> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }

    fn store(
        index: usize,
        value: &EncodedBuffer<'_>,
        fields: &mut [Option<WireValue>],
    ) -> Result<(), WireError> {
        if value.is_null() {
            fields[index] = None;
            return Ok(());
        }
        let field = &S::FIELDS[index];
        let value = WireValue::deser(value)?;
        if !field.wire_type.admits(&value) {
            return Err(WireError::type_mismatch(
                field.wire_type.name(),
                format!("{} in field {} of {}", value.tag_name(), field.key, S::SYMBOLIC_ID),
            ));
        }
        fields[index] = Some(value);
        Ok(())
    }
}

impl<S: CompositeSchema> MapDecoder for SchemaDecoder<S> {
    type Container = Vec<Option<WireValue>>;

    fn create_container(&self, _entry_count: usize) -> Self::Container {
        vec![None; S::FIELDS.len()]
    }

    fn decode_entry(
        &self,
        key: &EncodedBuffer<'_>,
        value: &EncodedBuffer<'_>,
        container: &mut Self::Container,
    ) -> Result<(), WireError> {
        if key.is_null() {
            return Err(WireError::encoding(format!(
                "null key in {} map",
                S::SYMBOLIC_ID
            )));
        }
        let key = match WireValue::deser(key)? {
            WireValue::Symbol(s) => s,
            other => {
                return Err(WireError::type_mismatch("symbol key", other.tag_name()));
            }
        };
        // Every key must resolve to a schema field. An unrecognized key
        // fails the whole decode, wherever it sits among the entries.
        let index = S::field_index(&key).ok_or(WireError::UnexpectedField {
            symbolic_id: S::SYMBOLIC_ID,
            key,
        })?;
        Self::store(index, value, container)
    }
}

impl<S: CompositeSchema> ListDecoder for SchemaDecoder<S> {
    type Container = Vec<Option<WireValue>>;

    fn create_container(&self, _element_count: usize) -> Self::Container {
        vec![None; S::FIELDS.len()]
    }

    fn decode_element(
        &self,
        index: usize,
        element: &EncodedBuffer<'_>,
        container: &mut Self::Container,
    ) -> Result<(), WireError> {
        if index >= S::FIELDS.len() {
            return Err(WireError::encoding(format!(
                "list element {index} beyond the {} fields of {}",
                S::FIELDS.len(),
                S::SYMBOLIC_ID
            )));
        }
        Self::store(index, element, container)
    }
}

/// Decodes a composite body (either form) into field slots, then checks
/// the schema's required fields are all present.
pub(crate) fn decode_fields<S: CompositeSchema>(
    body: &EncodedBuffer<'_>,
) -> Result<Vec<Option<WireValue>>, WireError> {
    let decoder = SchemaDecoder::<S>::new();
    let code = body.format_code();
    let fields = if code.is_map() {
        decode_map(&decoder, body)?
    } else if code.is_list() {
        decode_list(&decoder, body)?
    } else {
        return Err(WireError::type_mismatch(
            "list or map composite body",
            format!("{code:?}"),
        ));
    };

    let missing = S::FIELDS
        .iter()
        .zip(&fields)
        .filter(|(field, slot)| field.required && slot.is_none())
        .map(|(field, _)| field.key)
        .join(", ");
    if !missing.is_empty() {
        return Err(WireError::encoding(format!(
            "{} is missing required fields: {missing}",
            S::SYMBOLIC_ID
        )));
    }
    Ok(fields)
}
