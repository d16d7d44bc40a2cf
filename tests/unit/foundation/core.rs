use super::*;

#[test]
fn canvas_validation_and_defaults() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(1920, 1080).unwrap();
    assert!((c.aspect_ratio() - 16.0 / 9.0).abs() < 1e-12);
    assert_eq!(Canvas::default(), Canvas::SQUARE_1080);
    assert_eq!(Canvas::SQUARE_1080.rgba8_len(), 1080 * 1080 * 4);
}

#[test]
fn raster_image_checks_buffer_length() {
    assert!(RasterImage::from_rgba8(2, 2, vec![0; 15], true).is_err());
    let img = RasterImage::from_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8], false).unwrap();
    assert_eq!(img.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(img.pixel(2, 0), None);
    assert_eq!(img.canvas(), Canvas { width: 2, height: 1 });
}
