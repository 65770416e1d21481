use album_document::*;
use album_layout::{DimensionResolver, ImageSource};
use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
use std::io::Cursor;
use std::path::{Path, PathBuf};

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::new(width, height).save(&path).unwrap();
    path
}

/// A little-endian TIFF block with XResolution, YResolution and ResolutionUnit
fn tiff_resolution_block(x: u32, y: u32, unit: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD: 3 entries, values start after the 42 byte directory
    let data_offset = 8 + 2 + 3 * 12 + 4;
    tiff.extend_from_slice(&3u16.to_le_bytes());
    for (tag, offset) in [(0x011Au16, data_offset), (0x011B, data_offset + 8)] {
        tiff.extend_from_slice(&tag.to_le_bytes());
        tiff.extend_from_slice(&5u16.to_le_bytes()); // RATIONAL
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&(offset as u32).to_le_bytes());
    }
    tiff.extend_from_slice(&0x0128u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&unit.to_le_bytes());
    tiff.extend_from_slice(&0u16.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    for value in [x, y] {
        tiff.extend_from_slice(&value.to_le_bytes());
        tiff.extend_from_slice(&1u32.to_le_bytes());
    }
    tiff
}

/// A JPEG with an EXIF APP1 segment right after the start-of-image marker
fn write_jpeg_with_resolution(dir: &Path, name: &str, x: u32, y: u32, unit: u16) -> PathBuf {
    let mut jpeg = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(600, 300))
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    let tiff = tiff_resolution_block(x, y, unit);
    let mut app1 = vec![0xFF, 0xE1];
    app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&app1);
    bytes.extend_from_slice(&jpeg[2..]);

    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_png_dimensions_without_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "plain.png", 320, 200);

    let meta = FileImageSource.open_image(&path).unwrap();
    assert_eq!((meta.pixel_width, meta.pixel_height), (320, 200));
    assert_eq!(meta.resolution_x, None);
    assert_eq!(meta.resolution_y, None);
}

#[test]
fn test_exif_resolution_in_inches() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_jpeg_with_resolution(dir.path(), "scan.jpg", 300, 150, 2);

    assert_eq!(probe_dimensions(&path).unwrap(), (600, 300));
    let (x, y) = read_resolution(&path).unwrap();
    assert_eq!(x, Some(300.0));
    assert_eq!(y, Some(150.0));

    // 600 px at 300 dpi = 2 in, 300 px at 150 dpi = 2 in
    let mut resolver = DimensionResolver::new(FileImageSource, 96.0);
    let asset = resolver.resolve(&path);
    assert!((asset.width_cm - 5.08).abs() < 1e-3);
    assert!((asset.height_cm - 5.08).abs() < 1e-3);
}

#[test]
fn test_exif_resolution_in_centimeters() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_jpeg_with_resolution(dir.path(), "scan.jpg", 100, 100, 3);

    let (x, y) = read_resolution(&path).unwrap();
    assert!((x.unwrap() - 254.0).abs() < 1e-3);
    assert!((y.unwrap() - 254.0).abs() < 1e-3);
}

/// A JPEG carrying only a JFIF density, no EXIF
fn write_jpeg_with_density(dir: &Path, name: &str, density: PixelDensity) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    let mut encoder = JpegEncoder::new_with_quality(&mut file, 90);
    encoder.set_pixel_density(density);
    encoder.encode_image(&image::GrayImage::new(900, 600)).unwrap();
    path
}

/// A PNG with a pHYs chunk in pixels per meter
fn write_png_with_phys(dir: &Path, name: &str, ppm: u32) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 600, 300);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(&vec![255u8; 600 * 300]).unwrap();
    writer.finish().unwrap();
    path
}

#[test]
fn test_jfif_density_in_inches() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_jpeg_with_density(dir.path(), "receipt.jpg", PixelDensity::dpi(300));

    let meta = FileImageSource.open_image(&path).unwrap();
    assert_eq!(meta.resolution_x, Some(300.0));
    assert_eq!(meta.resolution_y, Some(300.0));

    // 900 x 600 px at 300 dpi = 3 x 2 in
    let mut resolver = DimensionResolver::new(FileImageSource, 96.0);
    let asset = resolver.resolve(&path);
    assert!((asset.width_cm - 7.62).abs() < 1e-3);
    assert!((asset.height_cm - 5.08).abs() < 1e-3);
}

#[test]
fn test_jfif_density_in_centimeters() {
    let dir = tempfile::tempdir().unwrap();
    let density = PixelDensity {
        density: (100, 50),
        unit: PixelDensityUnit::Centimeters,
    };
    let path = write_jpeg_with_density(dir.path(), "receipt.jpg", density);

    let (x, y) = read_resolution(&path).unwrap();
    assert!((x.unwrap() - 254.0).abs() < 1e-3);
    assert!((y.unwrap() - 127.0).abs() < 1e-3);
}

#[test]
fn test_jfif_aspect_ratio_only_has_no_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let density = PixelDensity {
        density: (1, 1),
        unit: PixelDensityUnit::PixelAspectRatio,
    };
    let path = write_jpeg_with_density(dir.path(), "photo.jpg", density);

    assert_eq!(read_resolution(&path).unwrap(), (None, None));
}

#[test]
fn test_png_phys_resolution() {
    let dir = tempfile::tempdir().unwrap();
    // 11811 px/m is 300 dpi
    let path = write_png_with_phys(dir.path(), "scan.png", 11811);

    let meta = FileImageSource.open_image(&path).unwrap();
    assert_eq!((meta.pixel_width, meta.pixel_height), (600, 300));
    assert!((meta.resolution_x.unwrap() - 300.0).abs() < 0.01);
    assert!((meta.resolution_y.unwrap() - 300.0).abs() < 0.01);

    let mut resolver = DimensionResolver::new(FileImageSource, 96.0);
    let asset = resolver.resolve(&path);
    assert!((asset.width_cm - 5.08).abs() < 1e-2);
}

#[test]
fn test_unreadable_files_become_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("notes.png");
    std::fs::write(&text, "not an image").unwrap();
    let missing = dir.path().join("missing.jpg");

    assert!(FileImageSource.open_image(&text).is_err());
    assert!(FileImageSource.open_image(&missing).is_err());

    let mut resolver = DimensionResolver::new(FileImageSource, 96.0);
    let assets = resolver.resolve_all(&[&text, &missing]);
    assert!(assets.iter().all(|a| a.placeholder));
    assert_eq!(resolver.take_failures().len(), 2);
}
