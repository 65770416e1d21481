//! Page composition
//!
//! Turns one page group into placement instructions. Groups of one or two
//! images are a single composition unit. Larger groups are realized as
//! consecutive two-image units on the same page, one grid row each.

use log::debug;

use crate::config::LayoutConfig;
use crate::constants::IMAGES_PER_UNIT;
use crate::types::HorizontalAlign;

use super::{BoundingBox, ImageAsset, LayoutInstruction, PageGroup, Placement, Slot, scale_image};

/// Arrangement chosen for a two-image unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairArrangement {
    /// Both images tall and narrow: two columns in one row
    SideBySide,
    /// One above the other
    Stacked,
}

/// Decides concrete arrangements and sizes for page groups
#[derive(Debug, Clone, PartialEq)]
pub struct PageComposer {
    single: BoundingBox,
    stacked: BoundingBox,
    side_by_side: BoundingBox,
    grid: BoundingBox,
    tall_ratio: f32,
}

impl PageComposer {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            single: config.single_box(),
            stacked: config.stacked_box(),
            side_by_side: config.side_by_side_box(),
            grid: config.grid_box(),
            tall_ratio: config.tall_ratio,
        }
    }

    /// Whether an image's height/width ratio marks it as tall and narrow
    pub fn is_tall(&self, image: &ImageAsset) -> bool {
        image.height_to_width() > self.tall_ratio
    }

    /// Pick the arrangement for two images sharing a page
    pub fn pair_arrangement(&self, first: &ImageAsset, second: &ImageAsset) -> PairArrangement {
        if self.is_tall(first) && self.is_tall(second) {
            PairArrangement::SideBySide
        } else {
            PairArrangement::Stacked
        }
    }

    /// Instructions for one page group, without a trailing page break
    pub fn compose(&self, group: &PageGroup) -> Vec<LayoutInstruction> {
        match group.images() {
            [] => Vec::new(),
            [image] => vec![LayoutInstruction::Place(place(image, &self.single, Slot::Full))],
            [first, second] => self.compose_pair(first, second),
            images => self.compose_grid(images),
        }
    }

    fn compose_pair(&self, first: &ImageAsset, second: &ImageAsset) -> Vec<LayoutInstruction> {
        let arrangement = self.pair_arrangement(first, second);
        debug!(
            "compose: {:?} for {} and {}",
            arrangement,
            first.path.display(),
            second.path.display()
        );

        match arrangement {
            PairArrangement::SideBySide => {
                let cell = |image: &ImageAsset, column: usize| {
                    Some(place(image, &self.side_by_side, Slot::SideBySide { column }))
                };
                vec![LayoutInstruction::Row([cell(first, 0), cell(second, 1)])]
            }
            PairArrangement::Stacked => [first, second]
                .into_iter()
                .enumerate()
                .map(|(index, image)| {
                    LayoutInstruction::Place(place(image, &self.stacked, Slot::Stacked { index }))
                })
                .collect(),
        }
    }

    fn compose_grid(&self, images: &[ImageAsset]) -> Vec<LayoutInstruction> {
        debug!("compose: grid of {} images", images.len());

        images
            .chunks(IMAGES_PER_UNIT)
            .enumerate()
            .filter_map(|(row, unit)| match unit {
                [left, right] => Some(LayoutInstruction::Row([
                    Some(place(left, &self.grid, Slot::Grid { row, column: 0 })),
                    Some(place(right, &self.grid, Slot::Grid { row, column: 1 })),
                ])),
                [single, ..] => Some(LayoutInstruction::Place(place(
                    single,
                    &self.grid,
                    Slot::Grid { row, column: 0 },
                ))),
                [] => None,
            })
            .collect()
    }
}

fn place(image: &ImageAsset, bounds: &BoundingBox, slot: Slot) -> Placement {
    let (width_cm, height_cm) = scale_image(image, bounds);
    Placement {
        path: image.path.clone(),
        width_cm,
        height_cm,
        slot,
        align: HorizontalAlign::Center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ImageMetadata;

    fn image(name: &str, px_w: u32, px_h: u32) -> ImageAsset {
        let meta = ImageMetadata {
            pixel_width: px_w,
            pixel_height: px_h,
            resolution_x: None,
            resolution_y: None,
        };
        ImageAsset::from_metadata(name, &meta, 96.0)
    }

    fn placements(instructions: &[LayoutInstruction]) -> Vec<&Placement> {
        instructions
            .iter()
            .flat_map(|instruction| match instruction {
                LayoutInstruction::Place(p) => vec![p],
                LayoutInstruction::Row(cells) => cells.iter().flatten().collect(),
                LayoutInstruction::PageBreak => vec![],
            })
            .collect()
    }

    #[test]
    fn test_single_image_fills_usable_area() {
        let composer = PageComposer::new(&LayoutConfig::default());
        let group = PageGroup::new(vec![image("a.png", 3000, 2000)]);
        let out = composer.compose(&group);

        assert_eq!(out.len(), 1);
        let LayoutInstruction::Place(p) = &out[0] else {
            panic!("expected a single placement, got {:?}", out[0]);
        };
        assert_eq!(p.slot, Slot::Full);
        assert_eq!(p.align, HorizontalAlign::Center);
        assert!((p.width_cm - 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_small_image_is_not_upscaled() {
        let composer = PageComposer::new(&LayoutConfig::default());
        let group = PageGroup::new(vec![image("tiny.png", 96, 48)]);
        let out = composer.compose(&group);
        let p = placements(&out)[0];
        assert!((p.width_cm - 2.54).abs() < 1e-3);
        assert!((p.height_cm - 1.27).abs() < 1e-3);
    }

    #[test]
    fn test_two_tall_images_go_side_by_side() {
        let composer = PageComposer::new(&LayoutConfig::default());
        // Height/width ratio 2.0
        let group = PageGroup::new(vec![image("a.png", 1000, 2000), image("b.png", 1000, 2000)]);
        let out = composer.compose(&group);

        assert_eq!(out.len(), 1);
        let LayoutInstruction::Row([Some(left), Some(right)]) = &out[0] else {
            panic!("expected a two-column row, got {:?}", out[0]);
        };
        assert_eq!(left.slot, Slot::SideBySide { column: 0 });
        assert_eq!(right.slot, Slot::SideBySide { column: 1 });
        // Half the usable width each
        assert!((left.width_cm - 8.0).abs() < 1e-3);
        assert!((right.width_cm - 8.0).abs() < 1e-3);
        assert!((left.height_cm - 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_two_squares_are_stacked() {
        let composer = PageComposer::new(&LayoutConfig::default());
        let group = PageGroup::new(vec![image("a.png", 1000, 1000), image("b.png", 1000, 1000)]);
        let out = composer.compose(&group);

        assert_eq!(out.len(), 2);
        for (index, p) in placements(&out).into_iter().enumerate() {
            assert_eq!(p.slot, Slot::Stacked { index });
            // Half the usable height each
            assert!((p.height_cm - 10.35).abs() < 1e-3);
            assert!((p.width_cm - 10.35).abs() < 1e-3);
        }
    }

    #[test]
    fn test_one_tall_image_is_not_enough_for_side_by_side() {
        let composer = PageComposer::new(&LayoutConfig::default());
        let tall = image("tall.png", 1000, 2000);
        let square = image("square.png", 1000, 1000);
        assert_eq!(
            composer.pair_arrangement(&tall, &square),
            PairArrangement::Stacked
        );
        let almost = image("almost.png", 1000, 1190);
        assert!(!composer.is_tall(&almost));
        assert!(composer.is_tall(&image("strip.png", 1000, 1210)));
    }

    #[test]
    fn test_four_images_form_two_grid_rows() {
        let composer = PageComposer::new(&LayoutConfig::default());
        let images: Vec<ImageAsset> = (0..4)
            .map(|i| image(&format!("{i}.png"), 1000, 1000))
            .collect();
        let out = composer.compose(&PageGroup::new(images));

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|i| matches!(i, LayoutInstruction::Row(_))));
        let slots: Vec<Slot> = placements(&out).iter().map(|p| p.slot).collect();
        assert_eq!(
            slots,
            vec![
                Slot::Grid { row: 0, column: 0 },
                Slot::Grid { row: 0, column: 1 },
                Slot::Grid { row: 1, column: 0 },
                Slot::Grid { row: 1, column: 1 },
            ]
        );
        assert!(placements(&out).iter().all(|p| (p.width_cm - 7.68).abs() < 1e-3));
    }

    #[test]
    fn test_three_images_end_with_centered_single() {
        let composer = PageComposer::new(&LayoutConfig::default());
        let images: Vec<ImageAsset> = (0..3)
            .map(|i| image(&format!("{i}.png"), 1000, 1000))
            .collect();
        let out = composer.compose(&PageGroup::new(images));

        assert_eq!(out.len(), 2);
        let LayoutInstruction::Place(last) = &out[1] else {
            panic!("expected a single placement, got {:?}", out[1]);
        };
        assert_eq!(last.slot, Slot::Grid { row: 1, column: 0 });
        assert_eq!(last.align, HorizontalAlign::Center);
    }
}
