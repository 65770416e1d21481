//! Shared constants for album layout
//!
//! All layout arithmetic happens in centimeters. Pixel measurements are
//! converted once, in the dimension resolver.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Centimeters per inch
pub const CM_PER_INCH: f32 = 2.54;

/// Points per centimeter (1 inch = 72 points)
pub const POINTS_PER_CM: f32 = 72.0 / CM_PER_INCH; // ≈ 28.3465

/// Convert centimeters to points
#[inline]
pub fn cm_to_pt(cm: f32) -> f32 {
    cm * POINTS_PER_CM
}

/// Convert pixels at the given resolution (dots per inch) to centimeters
#[inline]
pub fn px_to_cm(pixels: u32, dpi: f32) -> f32 {
    pixels as f32 / dpi * CM_PER_INCH
}

// =============================================================================
// Image Defaults
// =============================================================================

/// Resolution assumed when an image carries no resolution metadata
pub const DEFAULT_DPI: f32 = 96.0;

/// Placeholder width used when an image cannot be decoded (cm)
pub const FALLBACK_WIDTH_CM: f32 = 10.0;

/// Placeholder height used when an image cannot be decoded (cm)
pub const FALLBACK_HEIGHT_CM: f32 = 10.0;

// =============================================================================
// Page Defaults
// =============================================================================

/// Default page margin on every side (cm)
pub const DEFAULT_MARGIN_CM: f32 = 2.5;

/// Vertical space kept free at the top of the usable area for the title (cm)
pub const DEFAULT_HEADING_RESERVE_CM: f32 = 4.0;

/// Vertical gap between two image rows (cm)
pub const DEFAULT_IMAGE_GAP_CM: f32 = 0.5;

/// Preferred minimum width of a placed image, for legibility (cm)
pub const DEFAULT_MIN_IMAGE_WIDTH_CM: f32 = 4.0;

/// Height/width ratio above which an image counts as tall and narrow
pub const DEFAULT_TALL_RATIO: f32 = 1.2;

/// Share of the usable width given to each image of a four-image page
pub const GRID_WIDTH_FRACTION: f32 = 0.48;

/// Share of the usable height given to each row of a four-image page
pub const GRID_HEIGHT_FRACTION: f32 = 0.4;

// =============================================================================
// Grouping
// =============================================================================

/// Largest number of images that can share one page
pub const MAX_IMAGES_PER_PAGE: usize = 4;

/// Number of images composed together as one unit
pub const IMAGES_PER_UNIT: usize = 2;
