use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn loader() -> ImageLoader {
    ImageLoader::new(LoaderConfig::default()).unwrap()
}

#[test]
fn loads_embedded_bytes() {
    let img = loader()
        .load(&ImageSource::Bytes(png_bytes(3, 2, [1, 2, 3, 4])))
        .unwrap();
    assert_eq!((img.width(), img.height()), (3, 2));
    assert_eq!(img.pixel(0, 0), Some([1, 2, 3, 4]));
}

#[test]
fn loads_from_path() {
    let path = std::env::temp_dir().join(format!("packshot_loader_{}.png", std::process::id()));
    std::fs::write(&path, png_bytes(2, 2, [5, 6, 7, 255])).unwrap();

    let img = loader().load(&ImageSource::Path(path.clone())).unwrap();
    assert_eq!(img.pixel(1, 1), Some([5, 6, 7, 255]));
    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_path_is_fetch_error() {
    let err = loader()
        .load(&ImageSource::parse("/definitely/not/here/packshot.png"))
        .unwrap_err();
    assert!(matches!(err, PackshotError::Fetch(_)));
}

#[test]
fn empty_bytes_are_decode_error() {
    let err = loader().load(&ImageSource::Bytes(Vec::new())).unwrap_err();
    assert!(matches!(err, PackshotError::Decode(_)));
}

#[test]
fn oversize_source_is_rejected() {
    let loader = ImageLoader::new(LoaderConfig {
        max_bytes: 8,
        ..LoaderConfig::default()
    })
    .unwrap();
    let err = loader
        .load(&ImageSource::Bytes(png_bytes(4, 4, [0, 0, 0, 255])))
        .unwrap_err();
    assert!(matches!(err, PackshotError::Fetch(_)));
}

#[test]
fn config_defaults_fill_missing_json_fields() {
    let cfg: LoaderConfig = serde_json::from_str(r#"{"timeout_ms": 500}"#).unwrap();
    assert_eq!(cfg.timeout_ms, 500);
    assert_eq!(cfg.max_bytes, LoaderConfig::default().max_bytes);
}

#[test]
fn unreachable_url_is_fetch_error() {
    // Port 9 (discard) on loopback refuses the connection without leaving the host.
    let loader = ImageLoader::new(LoaderConfig {
        timeout_ms: 2_000,
        ..LoaderConfig::default()
    })
    .unwrap();
    let source = ImageSource::parse("http://127.0.0.1:9/x.png");
    assert!(matches!(source, ImageSource::Url(_)));

    let err = loader.load(&source).unwrap_err();
    assert!(matches!(err, PackshotError::Fetch(_)), "{err}");
    assert!(err.to_string().contains("127.0.0.1:9"));
}

#[test]
fn oversize_file_is_rejected() {
    let path = std::env::temp_dir().join(format!("packshot_big_{}.png", std::process::id()));
    std::fs::write(&path, png_bytes(8, 8, [9, 9, 9, 255])).unwrap();

    let loader = ImageLoader::new(LoaderConfig {
        max_bytes: 16,
        ..LoaderConfig::default()
    })
    .unwrap();
    let err = loader.load(&ImageSource::Path(path.clone())).unwrap_err();
    let _ = std::fs::remove_file(path);
    assert!(matches!(err, PackshotError::Fetch(_)));
    assert!(err.to_string().contains("limit is 16"));
}
