use super::*;

#[test]
fn new_rejects_mismatched_length() {
    assert!(RasterImage::new(2, 2, vec![0; 15]).is_err());
    let img = RasterImage::new(2, 2, vec![0; 16]).unwrap();
    assert_eq!(img.size(), Size::new(2, 2));
}

#[test]
fn pixel_access_is_row_major() {
    let mut img = RasterImage::filled(3, 2, [0, 0, 0, 255]);
    img.put_pixel(2, 1, [1, 2, 3, 4]);
    assert_eq!(img.pixel(2, 1), Some([1, 2, 3, 4]));
    assert_eq!(&img.as_raw()[20..24], &[1, 2, 3, 4]);
    assert_eq!(img.pixel(3, 0), None);
    assert!(!img.is_opaque());
}

#[test]
fn alpha_bounds_and_trim() {
    let mut img = RasterImage::filled(5, 4, [255, 255, 255, 0]);
    img.put_pixel(1, 1, [9, 9, 9, 255]);
    img.put_pixel(3, 2, [9, 9, 9, 10]);
    assert_eq!(img.alpha_bounds(), Some(PixelRect::new(1, 1, 3, 2)));

    let trimmed = img.trim_transparent();
    assert_eq!(trimmed.size(), Size::new(3, 2));
    assert_eq!(trimmed.pixel(0, 0), Some([9, 9, 9, 255]));
    assert_eq!(trimmed.pixel(2, 1), Some([9, 9, 9, 10]));
}

#[test]
fn fully_transparent_image_is_not_trimmed() {
    let img = RasterImage::filled(4, 4, [0, 0, 0, 0]);
    assert_eq!(img.alpha_bounds(), None);
    assert_eq!(img.clone().trim_transparent(), img);
}

#[test]
fn converts_to_and_from_rgba_image() {
    let img = RasterImage::filled(2, 1, [10, 20, 30, 40]);
    let rgba: image::RgbaImage = img.clone().into();
    assert_eq!(rgba.get_pixel(1, 0).0, [10, 20, 30, 40]);
    assert_eq!(RasterImage::from(rgba), img);
}
