use amqp_composite::sasl::{SaslMechanismsBean, SaslMechanismsBuffer};
use amqp_composite::source::SourceBean;
use amqp_wire::serde::{EncodedBuffer, FormatCode};
use amqp_wire::types::Symbol;
use amqp_wire::WireError;
use anyhow::{anyhow, Result};

#[test]
fn list_encoding_holds_positions_with_nulls() -> Result<()> {
    let mut bean = SaslMechanismsBean::new();
    bean.set_sasl_server_mechanisms(vec!["PLAIN".into(), "ANONYMOUS".into()]);
    let bytes = bean.encoded_bytes()?;

    let view = EncodedBuffer::new(bytes, 0)?;
    let body = view.as_described()?.value();
    assert!(body.format_code().is_list());

    let elements = body.list_elements()?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(elements.len(), 2);
    // The absent options field keeps its slot as a null.
    assert_eq!(elements[0].format_code(), FormatCode::Null);
    assert!(elements[1].format_code().is_list());
    Ok(())
}

#[test]
fn mechanism_order_survives_the_roundtrip() -> Result<()> {
    let mechanisms: Vec<Symbol> =
        vec!["EXTERNAL".into(), "PLAIN".into(), "ANONYMOUS".into()];

    let mut bean = SaslMechanismsBean::new();
    bean.set_sasl_server_mechanisms(mechanisms.clone());
    let bytes = bean.encoded_bytes()?;

    let view = EncodedBuffer::new(bytes, 0)?;
    let buffer = SaslMechanismsBuffer::create(view)?.ok_or(anyhow!("null"))?;
    let decoded = buffer.bean()?;
    assert_eq!(decoded.options(), None);
    assert_eq!(decoded.sasl_server_mechanisms()?, mechanisms);
    Ok(())
}

#[test]
fn a_foreign_descriptor_is_rejected() -> Result<()> {
    let mut source = SourceBean::new();
    source.set_timeout(Some(30));
    let bytes = source.encoded_bytes()?;

    let view = EncodedBuffer::new(bytes, 0)?;
    match SaslMechanismsBuffer::create(view) {
        Err(WireError::TypeMismatch { expected, .. }) => {
            assert_eq!(expected, "amqp:sasl-mechanisms:list");
            Ok(())
        }
        Err(other) => Err(anyhow!("expected type mismatch, got {other}")),
        Ok(_) => Err(anyhow!("expected type mismatch, got a buffer")),
    }
}

#[test]
fn missing_mechanism_list_fails_on_decode() -> Result<()> {
    let bean = SaslMechanismsBean::new();
    let bytes = bean.encoded_bytes()?;

    let view = EncodedBuffer::new(bytes, 0)?;
    let buffer = SaslMechanismsBuffer::create(view)?.ok_or(anyhow!("null"))?;
    match buffer.bean() {
        Err(WireError::Encoding { reason }) => {
            assert!(reason.contains("sasl-server-mechanisms"), "{reason}");
            Ok(())
        }
        other => Err(anyhow!("expected encoding error, got {other:?}")),
    }
}
