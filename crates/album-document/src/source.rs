//! Reading image size and resolution from files

use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use album_layout::constants::CM_PER_INCH;
use album_layout::{DecodeError, ImageMetadata, ImageSource};
use exif::{In, Tag, Value};
use image::ImageReader;
use log::debug;

use crate::types::*;

/// EXIF `ResolutionUnit` value for inches
const UNIT_INCH: u32 = 2;
/// EXIF `ResolutionUnit` value for centimeters
const UNIT_CM: u32 = 3;

/// JFIF density units
const JFIF_UNIT_INCH: u8 = 1;
const JFIF_UNIT_CM: u8 = 2;

/// Start-of-image marker, APP0 marker and length, then the 12 byte JFIF payload
const JFIF_HEADER_LEN: usize = 18;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

const METERS_PER_INCH: f32 = 0.0254;

/// Image source backed by the filesystem.
///
/// Pixel dimensions come from the image header; resolution from EXIF, JFIF or
/// PNG metadata when the file has it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource;

impl ImageSource for FileImageSource {
    fn open_image(&self, path: &Path) -> std::result::Result<ImageMetadata, DecodeError> {
        let (pixel_width, pixel_height) =
            probe_dimensions(path).map_err(|e| DecodeError::new(path, e.to_string()))?;

        let (resolution_x, resolution_y) = match read_resolution(path) {
            Ok(resolution) => resolution,
            Err(e) => {
                debug!("no resolution metadata in {}: {}", path.display(), e);
                (None, None)
            }
        };

        Ok(ImageMetadata {
            pixel_width,
            pixel_height,
            resolution_x,
            resolution_y,
        })
    }
}

/// Pixel width and height, read from the header without decoding the image
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    let dimensions = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(dimensions)
}

/// Horizontal and vertical resolution in dots per inch.
///
/// EXIF wins when present; otherwise the JFIF density of a JPEG or the pHYs
/// chunk of a PNG is used.
pub fn read_resolution(path: &Path) -> Result<(Option<f32>, Option<f32>)> {
    match exif_resolution(path) {
        Ok((None, None)) => {}
        Ok(resolution) => return Ok(resolution),
        Err(e) => debug!("no EXIF resolution in {}: {}", path.display(), e),
    }

    let mut reader = BufReader::new(std::fs::File::open(path)?);
    let mut header = [0u8; JFIF_HEADER_LEN];
    let read = read_prefix(&mut reader, &mut header)?;
    let header = &header[..read];

    if header.starts_with(PNG_SIGNATURE) {
        reader.seek(SeekFrom::Start(0))?;
        png_resolution(reader)
    } else {
        Ok(jfif_resolution(header).unwrap_or((None, None)))
    }
}

fn exif_resolution(path: &Path) -> Result<(Option<f32>, Option<f32>)> {
    let file = std::fs::File::open(path)?;
    let exif = exif::Reader::new().read_from_container(&mut BufReader::new(file))?;

    let unit = exif
        .get_field(Tag::ResolutionUnit, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(UNIT_INCH);

    let dpi = |tag: Tag| -> Option<f32> {
        let field = exif.get_field(tag, In::PRIMARY)?;
        let value = match &field.value {
            Value::Rational(values) => values.first()?.to_f64(),
            _ => return None,
        };
        match unit {
            UNIT_INCH => Some(value as f32),
            UNIT_CM => Some(value as f32 * CM_PER_INCH),
            _ => None,
        }
    };

    Ok((dpi(Tag::XResolution), dpi(Tag::YResolution)))
}

/// Fill `buf` from the start of the file, stopping early at end of file
fn read_prefix(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Density from a JFIF APP0 segment directly after the start-of-image marker
fn jfif_resolution(header: &[u8]) -> Option<(Option<f32>, Option<f32>)> {
    // APP0 payload: "JFIF\0", version (2), units (1), x density (2), y density (2)
    let payload = header.strip_prefix(&[0xFF, 0xD8, 0xFF, 0xE0])?.get(2..14)?;
    if &payload[..5] != b"JFIF\0" {
        return None;
    }

    let scale = match payload[7] {
        JFIF_UNIT_INCH => 1.0,
        JFIF_UNIT_CM => CM_PER_INCH,
        _ => return None,
    };
    let density = |hi: u8, lo: u8| match u16::from_be_bytes([hi, lo]) {
        0 => None,
        d => Some(d as f32 * scale),
    };

    Some((density(payload[8], payload[9]), density(payload[10], payload[11])))
}

fn png_resolution<R: BufRead + Seek>(reader: R) -> Result<(Option<f32>, Option<f32>)> {
    let png = png::Decoder::new(reader).read_info()?;
    let Some(dims) = png.info().pixel_dims else {
        return Ok((None, None));
    };
    if dims.unit != png::Unit::Meter {
        return Ok((None, None));
    }

    let dpi = |ppm: u32| (ppm > 0).then(|| ppm as f32 * METERS_PER_INCH);
    Ok((dpi(dims.xppu), dpi(dims.yppu)))
}
