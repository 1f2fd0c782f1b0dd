use crate::schema::{CompositeForm, CompositeSchema};
use amqp_wire::serde::{Descriptor, Ser, WireValue, WriteLen};
use amqp_wire::WireError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

/// The mutable, in-memory side of a composite value: one slot per
/// schema field.
///
/// Field storage is shared copy-on-write: [`Self::copy`] is O(1), and a
/// later [`Self::set`] on either copy clones the slots before writing,
/// so copies never observe each other's mutations.
///
/// Taking the encoding with [`Self::encoded_bytes`] freezes the bean:
/// the bytes are memoized, and any further `set` panics rather than
/// letting the bean drift out of sync with bytes a caller already
/// holds. A frozen bean is still readable, and `copy` yields a fresh
/// unfrozen bean.
pub struct CompositeBean<S> {
    fields: Arc<Vec<Option<WireValue>>>,
    encoded: OnceLock<Vec<u8>>,
    schema: PhantomData<S>,
}

impl<S: CompositeSchema> CompositeBean<S> {
    pub fn new() -> Self {
        Self {
            fields: Arc::new(vec![None; S::FIELDS.len()]),
            encoded: OnceLock::new(),
            schema: PhantomData,
        }
    }

    pub(crate) fn from_fields(fields: Vec<Option<WireValue>>) -> Self {
        Self {
            fields: Arc::new(fields),
            encoded: OnceLock::new(),
            schema: PhantomData,
        }
    }

    /// The field at the given slot, `None` when absent.
    ///
    /// Panics if `index` is not a slot of this schema; slot indexes are
    /// static, so an out-of-range index is a caller bug, not wire data.
    pub fn get(&self, index: usize) -> Option<&WireValue> {
        match self.fields.get(index) {
            Some(slot) => slot.as_ref(),
            None => panic!(
                "field index {index} out of bounds for {} ({} fields)",
                S::SYMBOLIC_ID,
                S::FIELDS.len()
            ),
        }
    }

    /// Sets or clears the field at the given slot.
    ///
    /// Panics if the bean is frozen, if `index` is not a slot of this
    /// schema, or if the value's tag is not the one the field admits.
    /// All three are caller bugs.
    pub fn set(&mut self, index: usize, value: Option<WireValue>) {
        assert!(
            self.encoded.get().is_none(),
            "{} bean mutated after its encoding was taken",
            S::SYMBOLIC_ID
        );
        let field = match S::FIELDS.get(index) {
            Some(field) => field,
            None => panic!(
                "field index {index} out of bounds for {} ({} fields)",
                S::SYMBOLIC_ID,
                S::FIELDS.len()
            ),
        };
        if let Some(value) = &value {
            assert!(
                field.wire_type.admits(value),
                "field {} of {} holds a {}, not a {}",
                field.key,
                S::SYMBOLIC_ID,
                field.wire_type.name(),
                value.tag_name()
            );
        }
        Arc::make_mut(&mut self.fields)[index] = value;
    }

    /// A mutable copy. Shares the field storage until either side
    /// mutates; never frozen, regardless of this bean's state.
    pub fn copy(&self) -> Self {
        Self {
            fields: Arc::clone(&self.fields),
            encoded: OnceLock::new(),
            schema: PhantomData,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.encoded.get().is_some()
    }

    /// The full described encoding of this bean, computed once and
    /// memoized. Freezes the bean.
    pub fn encoded_bytes(&self) -> Result<&[u8], WireError> {
        if self.encoded.get().is_none() {
            let bytes = self.compute_encoding()?;
            let _ = self.encoded.set(bytes);
        }
        Ok(self.encoded.get().unwrap())
    }

    fn compute_encoding(&self) -> Result<Vec<u8>, WireError> {
        let body = match S::FORM {
            CompositeForm::Map => {
                // Absent fields are omitted rather than carried as null
                // entries.
                let entries = self
                    .fields
                    .iter()
                    .enumerate()
                    .filter_map(|(index, slot)| {
                        slot.clone().map(|value| {
                            (
                                WireValue::Symbol(S::FIELDS[index].key.to_owned()),
                                value,
                            )
                        })
                    })
                    .collect();
                WireValue::Map(entries)
            }
            CompositeForm::List => {
                // Absent fields hold their position as nulls.
                let elements = self
                    .fields
                    .iter()
                    .map(|slot| slot.clone().unwrap_or(WireValue::Null))
                    .collect();
                WireValue::List(elements)
            }
        };
        let described = WireValue::Described(
            Descriptor::from_parts(S::CATEGORY, S::DESCRIPTOR_ID),
            Box::new(body),
        );
        described.ser_solo()
    }
}

impl<S: CompositeSchema> Default for CompositeBean<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CompositeSchema> Clone for CompositeBean<S> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/* Equality and hashing are structural over the fields; whether either
 * side is frozen does not matter. */

impl<S: CompositeSchema> PartialEq for CompositeBean<S> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}
impl<S: CompositeSchema> Eq for CompositeBean<S> {}

impl<S: CompositeSchema> Hash for CompositeBean<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

impl<S: CompositeSchema> fmt::Debug for CompositeBean<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(S::SYMBOLIC_ID);
        for (field, slot) in S::FIELDS.iter().zip(self.fields.iter()) {
            if let Some(value) = slot {
                s.field(field.key, value);
            }
        }
        s.finish()
    }
}

impl<S: CompositeSchema> Ser for CompositeBean<S> {
    fn ser<W: Write>(&self, w: &mut W) -> Result<WriteLen, WireError> {
        let bytes = self.encoded_bytes()?;
        w.write_all(bytes)?;
        Ok(WriteLen::new_manual(bytes.len()))
    }
}
