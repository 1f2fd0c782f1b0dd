use amqp_composite::source::{SourceBean, SourceBuffer};
use amqp_wire::serde::{Descriptor, EncodedBuffer, Ser, WireValue};
use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;

fn sample_bean() -> SourceBean {
    let mut bean = SourceBean::new();
    bean.set_address(Some("queue://foo".into()));
    bean.set_create(Some(true));
    bean.set_timeout(Some(30));
    bean
}

#[test]
fn encoding_carries_the_fixed_descriptor_preamble() -> Result<()> {
    let bean = sample_bean();
    let bytes = bean.encoded_bytes()?;

    assert_eq!(bytes[0], 0x00);
    // 0x80 + big-endian category + big-endian descriptor id, never
    // compacted.
    assert_eq!(&bytes[1..10], [0x80, 0, 0, 0, 1, 0, 0, 0x97, 0x01]);

    let view = EncodedBuffer::new(bytes, 0)?;
    let body = view.as_described()?.value();
    assert!(body.format_code().is_map());
    // Three present fields; absent ones are omitted, not null entries.
    assert_eq!(body.raw_count(), 6);
    Ok(())
}

#[test]
fn bean_to_buffer_roundtrip_is_field_equal() -> Result<()> {
    let bean = sample_bean();
    let bytes = bean.encoded_bytes()?;

    let view = EncodedBuffer::new(bytes, 0)?;
    let buffer = SourceBuffer::create(view)?.ok_or(anyhow!("null"))?;
    assert_eq!(buffer.bytes(), bytes);

    let decoded = buffer.bean()?;
    assert_eq!(decoded, &bean);
    assert_eq!(decoded.address().ok_or(anyhow!("no address"))?.as_str(), Some("queue://foo"));
    assert_eq!(decoded.create(), Some(true));
    assert_eq!(decoded.timeout(), Some(30));
    assert_eq!(decoded.distribution_mode(), None);
    assert_eq!(decoded.filter(), None);
    Ok(())
}

#[test]
fn map_entry_order_does_not_matter() -> Result<()> {
    let expected = sample_bean();

    let mut entries = vec![
        (
            WireValue::Symbol(String::from("address")),
            WireValue::Binary(b"queue://foo".to_vec()),
        ),
        (
            WireValue::Symbol(String::from("create")),
            WireValue::Boolean(true),
        ),
        (
            WireValue::Symbol(String::from("timeout")),
            WireValue::Uint(30),
        ),
    ];

    let mut rng = rand::thread_rng();
    for _ in 0..5 {
        entries.shuffle(&mut rng);
        let bytes = WireValue::Described(
            Descriptor::from_parts(1, 38657),
            Box::new(WireValue::Map(entries.clone())),
        )
        .ser_solo()?;

        let view = EncodedBuffer::new(&bytes, 0)?;
        let buffer = SourceBuffer::create(view)?.ok_or(anyhow!("null"))?;
        assert_eq!(buffer.bean()?, &expected);
    }
    Ok(())
}

#[test]
fn symbolic_descriptor_names_the_same_type() -> Result<()> {
    let bytes = WireValue::Described(
        Descriptor::Symbol(String::from("amqp:source:map")),
        Box::new(WireValue::Map(vec![(
            WireValue::Symbol(String::from("timeout")),
            WireValue::Uint(30),
        )])),
    )
    .ser_solo()?;

    let view = EncodedBuffer::new(&bytes, 0)?;
    let buffer = SourceBuffer::create(view)?.ok_or(anyhow!("null"))?;
    assert_eq!(buffer.bean()?.timeout(), Some(30));
    Ok(())
}

#[test]
fn mutating_a_decoded_composite_leaves_the_buffer_intact() -> Result<()> {
    let bytes = sample_bean().encoded_bytes()?.to_vec();
    let view = EncodedBuffer::new(&bytes, 0)?;
    let buffer = SourceBuffer::create(view)?.ok_or(anyhow!("null"))?;

    let mut updated = buffer.to_mutable()?;
    updated.set_timeout(Some(60));
    let updated_bytes = updated.encoded_bytes()?;

    assert_ne!(updated_bytes, &bytes[..]);
    assert_eq!(buffer.bytes(), &bytes[..]);
    assert_eq!(buffer.bean()?.timeout(), Some(30));

    let view = EncodedBuffer::new(updated_bytes, 0)?;
    let reread = SourceBuffer::create(view)?.ok_or(anyhow!("null"))?;
    assert_eq!(reread.bean()?.timeout(), Some(60));
    assert_eq!(
        reread.bean()?.address().ok_or(anyhow!("no address"))?.as_str(),
        Some("queue://foo")
    );
    Ok(())
}
