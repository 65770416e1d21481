//! Layout data types
//!
//! These types carry images from dimension resolution through grouping to
//! the final placement instructions handed to a document renderer.

use std::path::{Path, PathBuf};

use crate::constants::{FALLBACK_HEIGHT_CM, FALLBACK_WIDTH_CM, px_to_cm};
use crate::types::HorizontalAlign;

/// Maximum and minimum extents for a placed image, in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub max_width_cm: f32,
    pub max_height_cm: f32,
    /// Preferred lower bound on width. Yields to `max_height_cm`.
    pub min_width_cm: f32,
}

impl BoundingBox {
    pub fn new(max_width_cm: f32, max_height_cm: f32, min_width_cm: f32) -> Self {
        Self {
            max_width_cm,
            max_height_cm,
            min_width_cm,
        }
    }

    /// A box with no minimum width: images only ever shrink to fit it
    pub fn fit(max_width_cm: f32, max_height_cm: f32) -> Self {
        Self::new(max_width_cm, max_height_cm, 0.0)
    }
}

/// Raw image facts reported by an image source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetadata {
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Horizontal resolution in dots per inch, if the file records one
    pub resolution_x: Option<f32>,
    /// Vertical resolution in dots per inch, if the file records one
    pub resolution_y: Option<f32>,
}

/// An image with its physical size resolved
///
/// Created once per path by the dimension resolver and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub resolution_x: f32,
    pub resolution_y: f32,
    pub width_cm: f32,
    pub height_cm: f32,
    /// Pixel width / pixel height
    pub aspect_ratio: f32,
    /// True when the image could not be decoded and fallback dimensions are used
    pub placeholder: bool,
}

impl ImageAsset {
    /// Resolve physical dimensions from metadata, filling in `default_dpi`
    /// for missing or unusable resolutions.
    pub fn from_metadata(path: impl Into<PathBuf>, meta: &ImageMetadata, default_dpi: f32) -> Self {
        let usable = |dpi: Option<f32>| dpi.filter(|d| d.is_finite() && *d > 0.0);
        let resolution_x = usable(meta.resolution_x).unwrap_or(default_dpi);
        let resolution_y = usable(meta.resolution_y).unwrap_or(default_dpi);

        Self {
            path: path.into(),
            pixel_width: meta.pixel_width,
            pixel_height: meta.pixel_height,
            resolution_x,
            resolution_y,
            width_cm: px_to_cm(meta.pixel_width, resolution_x),
            height_cm: px_to_cm(meta.pixel_height, resolution_y),
            aspect_ratio: meta.pixel_width as f32 / meta.pixel_height as f32,
            placeholder: false,
        }
    }

    /// Fallback asset for an image that could not be read: 10x10 cm, ratio 1
    pub fn placeholder(path: impl Into<PathBuf>, default_dpi: f32) -> Self {
        Self {
            path: path.into(),
            pixel_width: 0,
            pixel_height: 0,
            resolution_x: default_dpi,
            resolution_y: default_dpi,
            width_cm: FALLBACK_WIDTH_CM,
            height_cm: FALLBACK_HEIGHT_CM,
            aspect_ratio: 1.0,
            placeholder: true,
        }
    }

    /// Physical height / physical width
    pub fn height_to_width(&self) -> f32 {
        self.height_cm / self.width_cm
    }
}

/// A committed set of 1 to 4 images rendered together on one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    images: Vec<ImageAsset>,
}

impl PageGroup {
    pub fn new(images: Vec<ImageAsset>) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.images.iter().map(|image| image.path.as_path())
    }

    /// Append another group's images, preserving order
    pub(crate) fn extend(&mut self, other: PageGroup) {
        self.images.extend(other.images);
    }
}

/// Where a placement sits within its page arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Alone on the page
    Full,
    /// One of two images stacked vertically (0 = upper)
    Stacked { index: usize },
    /// One of two tall images next to each other (0 = left)
    SideBySide { column: usize },
    /// A cell of a four-image page
    Grid { row: usize, column: usize },
}

/// Final size and position of one image
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub path: PathBuf,
    pub width_cm: f32,
    pub height_cm: f32,
    pub slot: Slot,
    pub align: HorizontalAlign,
}

/// One step for a document renderer to apply
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutInstruction {
    /// A single image on its own line
    Place(Placement),
    /// Two cells side by side; a cell may be empty
    Row([Option<Placement>; 2]),
    /// Start a new page
    PageBreak,
}
