//! Physical dimension resolution
//!
//! The resolver asks an [`ImageSource`] for raw pixel and resolution facts and
//! converts them to centimeters. Results are cached per path for one run.
//! Unreadable images get placeholder dimensions and are recorded as failures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::warn;

use crate::types::DecodeError;

use super::{ImageAsset, ImageMetadata};

/// Something that can report an image's pixel size and resolution
pub trait ImageSource {
    fn open_image(&self, path: &Path) -> std::result::Result<ImageMetadata, DecodeError>;
}

/// Converts images to [`ImageAsset`]s, caching each path once
pub struct DimensionResolver<S> {
    source: S,
    default_dpi: f32,
    cache: HashMap<PathBuf, ImageAsset>,
    failures: Vec<DecodeError>,
}

impl<S: ImageSource> DimensionResolver<S> {
    pub fn new(source: S, default_dpi: f32) -> Self {
        Self {
            source,
            default_dpi,
            cache: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Resolve one image.
    ///
    /// A decode failure is logged and recorded; the returned asset is then a
    /// 10x10 cm placeholder so the image can still be placed.
    pub fn resolve(&mut self, path: &Path) -> ImageAsset {
        if let Some(asset) = self.cache.get(path) {
            return asset.clone();
        }

        let asset = match self.source.open_image(path) {
            Ok(meta) if meta.pixel_width > 0 && meta.pixel_height > 0 => {
                ImageAsset::from_metadata(path, &meta, self.default_dpi)
            }
            Ok(meta) => self.fallback(DecodeError::new(
                path,
                format!(
                    "empty image ({}x{} px)",
                    meta.pixel_width, meta.pixel_height
                ),
            )),
            Err(err) => self.fallback(err),
        };

        self.cache.insert(path.to_path_buf(), asset.clone());
        asset
    }

    /// Resolve a sequence of images, preserving order
    pub fn resolve_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<ImageAsset> {
        paths.iter().map(|p| self.resolve(p.as_ref())).collect()
    }

    /// Decode failures recorded since the last call
    pub fn take_failures(&mut self) -> Vec<DecodeError> {
        std::mem::take(&mut self.failures)
    }

    fn fallback(&mut self, err: DecodeError) -> ImageAsset {
        warn!("{}; using placeholder size", err);
        let asset = ImageAsset::placeholder(&err.path, self.default_dpi);
        self.failures.push(err);
        asset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Reports fixed metadata per file name and counts calls
    struct FakeSource {
        calls: Cell<usize>,
    }

    impl ImageSource for FakeSource {
        fn open_image(&self, path: &Path) -> std::result::Result<ImageMetadata, DecodeError> {
            self.calls.set(self.calls.get() + 1);
            match path.file_name().and_then(|n| n.to_str()) {
                Some("broken.jpg") => Err(DecodeError::new(path, "truncated file")),
                Some("empty.png") => Ok(ImageMetadata {
                    pixel_width: 0,
                    pixel_height: 10,
                    resolution_x: None,
                    resolution_y: None,
                }),
                Some("print.tiff") => Ok(ImageMetadata {
                    pixel_width: 600,
                    pixel_height: 300,
                    resolution_x: Some(300.0),
                    resolution_y: Some(150.0),
                }),
                _ => Ok(ImageMetadata {
                    pixel_width: 960,
                    pixel_height: 480,
                    resolution_x: None,
                    resolution_y: Some(0.0),
                }),
            }
        }
    }

    fn resolver() -> DimensionResolver<FakeSource> {
        DimensionResolver::new(FakeSource { calls: Cell::new(0) }, 96.0)
    }

    #[test]
    fn test_missing_resolution_defaults_to_96_dpi() {
        let mut resolver = resolver();
        let asset = resolver.resolve(Path::new("photo.png"));
        assert_eq!(asset.resolution_x, 96.0);
        assert_eq!(asset.resolution_y, 96.0);
        assert!((asset.width_cm - 25.4).abs() < 1e-3);
        assert!((asset.height_cm - 12.7).abs() < 1e-3);
        assert!((asset.aspect_ratio - 2.0).abs() < 1e-6);
        assert!(!asset.placeholder);
    }

    #[test]
    fn test_axes_use_their_own_resolution() {
        let mut resolver = resolver();
        let asset = resolver.resolve(Path::new("print.tiff"));
        assert!((asset.width_cm - 5.08).abs() < 1e-3);
        assert!((asset.height_cm - 5.08).abs() < 1e-3);
        // Aspect ratio stays pixel based
        assert!((asset.aspect_ratio - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_failure_yields_placeholder_and_is_recorded() {
        let mut resolver = resolver();
        let asset = resolver.resolve(Path::new("broken.jpg"));
        assert!(asset.placeholder);
        assert_eq!((asset.width_cm, asset.height_cm), (10.0, 10.0));
        assert_eq!(asset.aspect_ratio, 1.0);

        let failures = resolver.take_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].reason, "truncated file");
        assert!(resolver.take_failures().is_empty());
    }

    #[test]
    fn test_zero_sized_image_is_a_decode_failure() {
        let mut resolver = resolver();
        let asset = resolver.resolve(Path::new("empty.png"));
        assert!(asset.placeholder);
        assert_eq!(resolver.take_failures().len(), 1);
    }

    #[test]
    fn test_each_path_is_opened_once() {
        let mut resolver = resolver();
        let paths = ["a.png", "b.png", "a.png", "broken.jpg", "broken.jpg"];
        let assets = resolver.resolve_all(&paths);

        assert_eq!(assets.len(), 5);
        assert_eq!(assets[0], assets[2]);
        assert_eq!(resolver.source.calls.get(), 3);
        // The cached failure is only recorded once
        assert_eq!(resolver.take_failures().len(), 1);
    }
}
