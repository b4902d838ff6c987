use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PackshotError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(PackshotError::fetch("x").to_string().contains("fetch error:"));
    assert!(
        PackshotError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PackshotError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PackshotError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), "other");
}

#[test]
fn image_decoding_errors_map_to_decode() {
    let err = image::load_from_memory(b"definitely not an image").unwrap_err();
    let mapped = PackshotError::from(err);
    assert_eq!(mapped.kind(), "decode");
}

#[test]
fn only_encode_errors_block_fallback() {
    assert!(PackshotError::decode("x").is_recoverable());
    assert!(PackshotError::fetch("x").is_recoverable());
    assert!(PackshotError::validation("x").is_recoverable());
    assert!(PackshotError::Other(anyhow::anyhow!("x")).is_recoverable());
    assert!(!PackshotError::encode("x").is_recoverable());
}
