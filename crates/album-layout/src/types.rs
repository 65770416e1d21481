use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Malformed page group #{index}: {len} images (expected 1 to 4)")]
    MalformedGroup { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// An image that could not be opened or decoded.
///
/// This is recoverable: the resolver substitutes placeholder dimensions and
/// the image is still placed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot decode {}: {reason}", path.display())]
pub struct DecodeError {
    pub path: PathBuf,
    pub reason: String,
}

impl DecodeError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width_cm: f32,
        height_cm: f32,
    },
}

impl PaperSize {
    /// Get base dimensions in centimeters (portrait for standard sizes)
    pub fn dimensions_cm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (29.7, 42.0),
            PaperSize::A4 => (21.0, 29.7),
            PaperSize::A5 => (14.8, 21.0),
            PaperSize::Letter => (21.59, 27.94),
            PaperSize::Legal => (21.59, 35.56),
            PaperSize::Tabloid => (27.94, 43.18),
            PaperSize::Custom {
                width_cm,
                height_cm,
            } => (width_cm, height_cm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_cm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Page margins in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageMargins {
    pub top_cm: f32,
    pub bottom_cm: f32,
    pub left_cm: f32,
    pub right_cm: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::uniform(crate::constants::DEFAULT_MARGIN_CM)
    }
}

impl PageMargins {
    /// Create uniform margins on all sides
    pub fn uniform(margin_cm: f32) -> Self {
        Self {
            top_cm: margin_cm,
            bottom_cm: margin_cm,
            left_cm: margin_cm,
            right_cm: margin_cm,
        }
    }
}

/// Horizontal alignment of a placed image within its line or cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}
