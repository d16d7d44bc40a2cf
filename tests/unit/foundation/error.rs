use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(CardError::parse("x").to_string().contains("parse error:"));
    assert!(
        CardError::invalid_argument("x")
            .to_string()
            .contains("invalid argument:")
    );
    assert!(
        CardError::resource_load("x")
            .to_string()
            .contains("resource load error:")
    );
    assert!(CardError::decode("x").to_string().contains("decode error:"));
    assert!(CardError::seek("x").to_string().contains("seek error:"));
    assert!(CardError::encode("x").to_string().contains("encode error:"));
    assert!(
        CardError::contract("x")
            .to_string()
            .contains("contract violation:")
    );
    assert!(CardError::batch("x").to_string().contains("batch failed:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
