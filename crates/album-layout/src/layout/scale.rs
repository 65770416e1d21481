//! Image scaling within a bounding box
//!
//! Scaling always preserves aspect ratio. Maximum width and height are hard
//! limits; the minimum width is a preference that gives way to the maximum
//! height.

use super::{BoundingBox, ImageAsset};

/// Calculate the placed size of an image with the given physical size.
///
/// 1. Shrink by the binding constraint if either side exceeds the box.
/// 2. If the result is narrower than `min_width_cm` (capped at the maximum
///    width), grow to that width.
/// 3. If growing pushed the height past `max_height_cm`, shrink back so the
///    height equals the maximum, letting the width drop below the minimum.
///
/// # Arguments
/// * `width_cm` - Physical width of the image
/// * `height_cm` - Physical height of the image
/// * `bounds` - The box to fit
///
/// # Returns
/// `(width_cm, height_cm)` of the placed image.
pub fn scale_to_box(width_cm: f32, height_cm: f32, bounds: &BoundingBox) -> (f32, f32) {
    let scale_w = if width_cm > bounds.max_width_cm {
        bounds.max_width_cm / width_cm
    } else {
        1.0
    };
    let scale_h = if height_cm > bounds.max_height_cm {
        bounds.max_height_cm / height_cm
    } else {
        1.0
    };
    let scale = scale_w.min(scale_h);

    let mut new_width = width_cm * scale;
    let mut new_height = height_cm * scale;

    // A minimum wider than the box can never be honored
    let min_width = bounds.min_width_cm.min(bounds.max_width_cm);
    if new_width < min_width {
        let grow = min_width / new_width;
        new_width = min_width;
        new_height *= grow;

        if new_height > bounds.max_height_cm {
            let shrink = bounds.max_height_cm / new_height;
            new_height = bounds.max_height_cm;
            new_width *= shrink;
        }
    }

    (new_width, new_height)
}

/// Scale a resolved image into a box
pub fn scale_image(image: &ImageAsset, bounds: &BoundingBox) -> (f32, f32) {
    scale_to_box(image.width_cm, image.height_cm, bounds)
}
