use amqp_composite::sasl::SaslMechanismsBean;
use amqp_composite::source::SourceBean;
use amqp_composite::{marshaller, DecodedComposite};
use amqp_wire::serde::StreamRead;
use amqp_wire::WireError;
use anyhow::{anyhow, Result};
use std::io::Cursor;

fn sample_source() -> SourceBean {
    let mut bean = SourceBean::new();
    bean.set_address(Some("queue://foo".into()));
    bean.set_timeout(Some(30));
    bean
}

fn sample_sasl() -> SaslMechanismsBean {
    let mut bean = SaslMechanismsBean::new();
    bean.set_sasl_server_mechanisms(vec!["PLAIN".into(), "ANONYMOUS".into()]);
    bean
}

#[test]
fn dispatch_by_descriptor() -> Result<()> {
    let source_bytes = sample_source().encoded_bytes()?.to_vec();
    match marshaller::decode(&source_bytes)? {
        Some(DecodedComposite::Source(buffer)) => {
            assert_eq!(buffer.bean()?.timeout(), Some(30));
        }
        _ => return Err(anyhow!("expected a source")),
    }

    let sasl_bytes = sample_sasl().encoded_bytes()?.to_vec();
    match marshaller::decode(&sasl_bytes)? {
        Some(DecodedComposite::SaslMechanisms(buffer)) => {
            assert_eq!(buffer.bean()?.sasl_server_mechanisms()?.len(), 2);
        }
        _ => return Err(anyhow!("expected sasl-mechanisms")),
    }
    Ok(())
}

#[test]
fn null_is_the_absent_composite() -> Result<()> {
    assert!(marshaller::decode(&[0x40])?.is_none());
    Ok(())
}

#[test]
fn unregistered_descriptor_is_rejected() -> Result<()> {
    // A described empty map under a descriptor nothing is registered
    // for: 0x00, ulong descriptor, map8 with zero entries.
    let mut bytes = vec![0x00, 0x80];
    bytes.extend_from_slice(&((3u64 << 32) | 7).to_be_bytes());
    bytes.extend_from_slice(&[0xc1, 1, 0]);

    match marshaller::decode(&bytes) {
        Err(WireError::TypeMismatch { .. }) => Ok(()),
        Err(other) => Err(anyhow!("expected type mismatch, got {other}")),
        Ok(_) => Err(anyhow!("expected type mismatch, got a composite")),
    }
}

#[test]
fn stream_of_composites_reads_in_order_until_eof() -> Result<()> {
    let mut bytes = vec![];
    bytes.extend_from_slice(sample_source().encoded_bytes()?);
    bytes.extend_from_slice(sample_sasl().encoded_bytes()?);
    bytes.extend_from_slice(sample_source().encoded_bytes()?);

    let mut r = Cursor::new(&bytes);
    let mut seen = vec![];
    loop {
        match marshaller::read_composite(&mut r)? {
            StreamRead::Eof => break,
            StreamRead::Value(composite) => seen.push(composite.symbolic_id()),
        }
    }
    assert_eq!(
        seen,
        ["amqp:source:map", "amqp:sasl-mechanisms:list", "amqp:source:map"]
    );
    Ok(())
}

#[test]
fn streamed_composites_own_their_bytes() -> Result<()> {
    let bytes = sample_source().encoded_bytes()?.to_vec();
    let mut r = Cursor::new(&bytes);

    let composite = match marshaller::read_composite(&mut r)? {
        StreamRead::Value(composite) => composite,
        StreamRead::Eof => return Err(anyhow!("unexpected eof")),
    };
    drop(r);

    assert_eq!(composite.bytes(), &bytes[..]);
    match composite {
        DecodedComposite::Source(buffer) => {
            assert_eq!(
                buffer.bean()?.address().ok_or(anyhow!("no address"))?.as_str(),
                Some("queue://foo")
            );
        }
        DecodedComposite::SaslMechanisms(_) => {
            return Err(anyhow!("expected a source"));
        }
    }
    Ok(())
}
