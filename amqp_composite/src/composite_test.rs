#[cfg(test)]
mod test {
    use crate::decode;
    use crate::sasl::{SaslMechanisms, SaslMechanismsBean};
    use crate::source::{Source, SourceBean, SourceBuffer};
    use crate::schema::{CompositeSchema, WireTypeTag};
    use amqp_wire::serde::{Descriptor, EncodedBuffer, Ser, WireValue};
    use amqp_wire::WireError;
    use anyhow::{anyhow, Result};

    fn sym(s: &str) -> WireValue {
        WireValue::Symbol(s.to_owned())
    }

    fn source_body(entries: Vec<(WireValue, WireValue)>) -> Result<Vec<u8>> {
        Ok(WireValue::Map(entries).ser_solo()?)
    }

    fn decode_source_body(bytes: &[u8]) -> Result<Vec<Option<WireValue>>, WireError> {
        let view = EncodedBuffer::new(bytes, 0)?;
        decode::decode_fields::<Source>(&view)
    }

    #[test]
    fn schema_constants() {
        assert_eq!(Source::NUMERIC_ID, 1 << 32 | 38657);
        assert_eq!(SaslMechanisms::NUMERIC_ID, 2 << 32 | 0x9801);
        assert_eq!(Source::field_index("timeout"), Some(2));
        assert_eq!(Source::field_index("unheard-of"), None);
        assert!(WireTypeTag::Uint.admits(&WireValue::Uint(1)));
        assert!(!WireTypeTag::Uint.admits(&WireValue::Ulong(1)));
    }

    #[test]
    fn map_body_fills_slots_by_key() -> Result<()> {
        let bytes = source_body(vec![
            (sym("timeout"), WireValue::Uint(30)),
            (sym("address"), WireValue::Binary(b"queue://foo".to_vec())),
        ])?;
        let fields = decode_source_body(&bytes)?;
        assert_eq!(fields[0], Some(WireValue::Binary(b"queue://foo".to_vec())));
        assert_eq!(fields[1], None);
        assert_eq!(fields[2], Some(WireValue::Uint(30)));
        Ok(())
    }

    #[test]
    fn unknown_key_fails_at_any_position() -> Result<()> {
        // The bogus key first, last, and in the middle.
        for position in 0..3 {
            let mut entries = vec![
                (sym("create"), WireValue::Boolean(true)),
                (sym("timeout"), WireValue::Uint(30)),
            ];
            entries.insert(position, (sym("bogus"), WireValue::Uint(1)));
            let bytes = source_body(entries)?;
            match decode_source_body(&bytes) {
                Err(WireError::UnexpectedField { symbolic_id, key }) => {
                    assert_eq!(symbolic_id, "amqp:source:map");
                    assert_eq!(key, "bogus");
                }
                other => return Err(anyhow!("position {position}: got {other:?}")),
            }
        }
        Ok(())
    }

    #[test]
    fn null_key_is_an_encoding_error() -> Result<()> {
        let bytes = source_body(vec![(WireValue::Null, WireValue::Uint(1))])?;
        match decode_source_body(&bytes) {
            Err(WireError::Encoding { .. }) => Ok(()),
            other => Err(anyhow!("expected encoding error, got {other:?}")),
        }
    }

    #[test]
    fn non_symbol_key_is_a_type_mismatch() -> Result<()> {
        let bytes = source_body(vec![(WireValue::Uint(7), WireValue::Uint(1))])?;
        match decode_source_body(&bytes) {
            Err(WireError::TypeMismatch { .. }) => Ok(()),
            other => Err(anyhow!("expected type mismatch, got {other:?}")),
        }
    }

    #[test]
    fn wrong_field_tag_is_a_type_mismatch() -> Result<()> {
        // timeout is a uint, not a string.
        let bytes = source_body(vec![(
            sym("timeout"),
            WireValue::String(String::from("30")),
        )])?;
        match decode_source_body(&bytes) {
            Err(WireError::TypeMismatch { expected, .. }) => {
                assert_eq!(expected, "uint");
                Ok(())
            }
            other => Err(anyhow!("expected type mismatch, got {other:?}")),
        }
    }

    #[test]
    fn null_map_value_leaves_the_slot_absent() -> Result<()> {
        let bytes = source_body(vec![(sym("timeout"), WireValue::Null)])?;
        let fields = decode_source_body(&bytes)?;
        assert!(fields.iter().all(Option::is_none));
        Ok(())
    }

    #[test]
    fn list_body_fills_slots_by_position() -> Result<()> {
        let bytes = WireValue::List(vec![
            WireValue::Binary(b"a".to_vec()),
            WireValue::Null,
            WireValue::Uint(5),
        ])
        .ser_solo()?;
        let fields = decode_source_body(&bytes)?;
        assert_eq!(fields[0], Some(WireValue::Binary(b"a".to_vec())));
        assert_eq!(fields[1], None);
        assert_eq!(fields[2], Some(WireValue::Uint(5)));
        assert_eq!(fields[3], None);
        Ok(())
    }

    #[test]
    fn list_element_beyond_the_field_table_fails() -> Result<()> {
        let elements = vec![WireValue::Null; Source::FIELDS.len() + 1];
        let bytes = WireValue::List(elements).ser_solo()?;
        match decode_source_body(&bytes) {
            Err(WireError::Encoding { .. }) => Ok(()),
            other => Err(anyhow!("expected encoding error, got {other:?}")),
        }
    }

    #[test]
    fn missing_required_field_fails() -> Result<()> {
        // sasl-mechanisms with only the optional options field.
        let bytes = WireValue::List(vec![WireValue::Map(vec![])]).ser_solo()?;
        let view = EncodedBuffer::new(&bytes, 0)?;
        match decode::decode_fields::<SaslMechanisms>(&view) {
            Err(WireError::Encoding { .. }) => Ok(()),
            other => Err(anyhow!("expected encoding error, got {other:?}")),
        }
    }

    /* bean state machine */

    #[test]
    fn bean_accessors_roundtrip() {
        let mut bean = SourceBean::new();
        assert_eq!(bean.address(), None);
        bean.set_address(Some("queue://foo".into()));
        bean.set_create(Some(true));
        bean.set_timeout(Some(30));
        assert_eq!(bean.address().unwrap().as_str(), Some("queue://foo"));
        assert_eq!(bean.create(), Some(true));
        assert_eq!(bean.timeout(), Some(30));
        bean.set_timeout(None);
        assert_eq!(bean.timeout(), None);
    }

    #[test]
    fn copies_do_not_observe_each_others_mutations() {
        let mut original = SourceBean::new();
        original.set_create(Some(true));

        let mut copied = original.copy();
        assert_eq!(original, copied);

        copied.set_create(Some(false));
        assert_eq!(original.create(), Some(true));
        assert_eq!(copied.create(), Some(false));
        assert_ne!(original, copied);
    }

    #[test]
    fn copy_of_a_frozen_bean_is_mutable() -> Result<()> {
        let mut bean = SourceBean::new();
        bean.set_timeout(Some(30));
        let _ = bean.encoded_bytes()?;
        assert!(bean.is_frozen());

        let mut copied = bean.copy();
        assert!(!copied.is_frozen());
        copied.set_timeout(Some(60));
        assert_eq!(bean.timeout(), Some(30));
        Ok(())
    }

    #[test]
    #[should_panic(expected = "mutated after its encoding was taken")]
    fn set_after_freeze_panics() {
        let mut bean = SourceBean::new();
        bean.set_timeout(Some(30));
        let _ = bean.encoded_bytes().unwrap();
        bean.set_timeout(Some(60));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_slot_panics() {
        let bean = SourceBean::new();
        let _ = bean.get(Source::FIELDS.len());
    }

    #[test]
    #[should_panic(expected = "holds a uint")]
    fn wrong_tag_on_set_panics() {
        let mut bean = SourceBean::new();
        bean.set(2, Some(WireValue::String(String::from("30"))));
    }

    #[test]
    fn frozen_bytes_are_stable() -> Result<()> {
        let mut bean = SaslMechanismsBean::new();
        bean.set_sasl_server_mechanisms(vec!["PLAIN".into(), "ANONYMOUS".into()]);
        let first = bean.encoded_bytes()?.as_ptr();
        let second = bean.encoded_bytes()?.as_ptr();
        assert_eq!(first, second);
        Ok(())
    }

    /* buffer laziness */

    #[test]
    fn buffer_decodes_once_and_memoizes() -> Result<()> {
        let mut bean = SourceBean::new();
        bean.set_timeout(Some(30));
        let bytes = bean.encoded_bytes()?.to_vec();

        let view = EncodedBuffer::new(&bytes, 0)?;
        let buffer = SourceBuffer::create(view)?.ok_or(anyhow!("null"))?;
        assert_eq!(buffer.bytes(), &bytes[..]);

        let first = buffer.bean()? as *const _;
        let second = buffer.bean()? as *const _;
        assert!(std::ptr::eq(first, second));
        assert_eq!(buffer.bean()?.timeout(), Some(30));
        Ok(())
    }

    #[test]
    fn buffer_verifies_the_descriptor_eagerly() -> Result<()> {
        let bytes = WireValue::Described(
            Descriptor::from_parts(1, 99),
            Box::new(WireValue::Map(vec![])),
        )
        .ser_solo()?;
        let view = EncodedBuffer::new(&bytes, 0)?;
        match SourceBuffer::create(view) {
            Err(WireError::TypeMismatch { expected, .. }) => {
                assert_eq!(expected, "amqp:source:map");
                Ok(())
            }
            Err(other) => Err(anyhow!("expected type mismatch, got {other}")),
            Ok(_) => Err(anyhow!("expected type mismatch, got a buffer")),
        }
    }

    #[test]
    fn buffer_defers_schema_violations_to_bean() -> Result<()> {
        // Valid descriptor, bogus key: construction succeeds, decoding
        // the bean fails.
        let bytes = WireValue::Described(
            Descriptor::from_parts(1, 38657),
            Box::new(WireValue::Map(vec![(sym("bogus"), WireValue::Uint(1))])),
        )
        .ser_solo()?;
        let view = EncodedBuffer::new(&bytes, 0)?;
        let buffer = SourceBuffer::create(view)?.ok_or(anyhow!("null"))?;
        match buffer.bean() {
            Err(WireError::UnexpectedField { key, .. }) => {
                assert_eq!(key, "bogus");
                Ok(())
            }
            other => Err(anyhow!("expected unexpected-field, got {other:?}")),
        }
    }
}
