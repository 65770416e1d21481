//! Page capacity check for candidate groups
//!
//! Every candidate is measured as a 2x2 grid under the four-image box, even
//! when it only has two images. The check is conservative: the composer may
//! later pick a roomier arrangement for small groups.

use log::trace;

use crate::config::LayoutConfig;
use crate::constants::MAX_IMAGES_PER_PAGE;

use super::{BoundingBox, ImageAsset, scale_image};

/// Decides whether a group of images fits on one page
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityEvaluator {
    grid_box: BoundingBox,
    usable_height_cm: f32,
    gap_cm: f32,
}

impl CapacityEvaluator {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            grid_box: config.grid_box(),
            usable_height_cm: config.usable_height_cm(),
            gap_cm: config.image_gap_cm,
        }
    }

    /// Total height of the group laid out in two rows of two, including the
    /// row gap. Row 1 holds images 0 and 1, row 2 holds images 2 and 3.
    pub fn grid_height_cm(&self, images: &[ImageAsset]) -> f32 {
        let heights: Vec<f32> = images
            .iter()
            .map(|image| scale_image(image, &self.grid_box).1)
            .collect();

        let row_height = |row: &[f32]| row.iter().copied().fold(0.0_f32, f32::max);
        let (first, second) = heights.split_at(heights.len().min(2));

        row_height(first) + row_height(second) + self.gap_cm
    }

    /// Whether the group fits within the page's usable height.
    ///
    /// Groups of zero or one image always fit; groups larger than four never do.
    pub fn fits(&self, images: &[ImageAsset]) -> bool {
        match images.len() {
            0 | 1 => true,
            n if n > MAX_IMAGES_PER_PAGE => false,
            n => {
                let total = self.grid_height_cm(images);
                let fits = total <= self.usable_height_cm;
                trace!(
                    "capacity: {} images need {:.2} cm of {:.2} cm -> {}",
                    n, total, self.usable_height_cm, fits
                );
                fits
            }
        }
    }
}
