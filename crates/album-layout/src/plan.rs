//! Layout planning - from an ordered image list to placement instructions
//!
//! This module orchestrates the layout process:
//! 1. Group images into pages with a grouping strategy
//! 2. Check every group is well formed
//! 3. Compose each page lazily when instructions are requested

use log::info;

use crate::config::LayoutConfig;
use crate::constants::MAX_IMAGES_PER_PAGE;
use crate::layout::{
    CapacityEvaluator, GreedyGrouper, GroupingStrategy, ImageAsset, LayoutInstruction,
    PageComposer, PageGroup,
};
use crate::types::*;

/// Computes layout plans for one configuration
pub struct LayoutEngine<G = GreedyGrouper> {
    config: LayoutConfig,
    capacity: CapacityEvaluator,
    composer: PageComposer,
    strategy: G,
}

impl LayoutEngine<GreedyGrouper> {
    /// Create an engine with the default greedy grouping
    pub fn new(config: LayoutConfig) -> Result<Self> {
        Self::with_strategy(config, GreedyGrouper)
    }
}

impl<G: GroupingStrategy> LayoutEngine<G> {
    /// Create an engine with a custom grouping strategy
    pub fn with_strategy(config: LayoutConfig, strategy: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            capacity: CapacityEvaluator::new(&config),
            composer: PageComposer::new(&config),
            config,
            strategy,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Group the images and return a plan for composing them.
    ///
    /// Fails with [`LayoutError::MalformedGroup`] if the strategy produced an
    /// empty group or one with more than four images.
    pub fn plan(&self, images: &[ImageAsset]) -> Result<LayoutPlan<'_>> {
        let groups = self.strategy.group(images, &self.capacity);

        for (index, group) in groups.iter().enumerate() {
            if group.is_empty() || group.len() > MAX_IMAGES_PER_PAGE {
                return Err(LayoutError::MalformedGroup {
                    index,
                    len: group.len(),
                });
            }
        }

        info!(
            "planned {} images on {} pages ({:?})",
            images.len(),
            groups.len(),
            groups.iter().map(PageGroup::len).collect::<Vec<_>>()
        );

        Ok(LayoutPlan {
            composer: &self.composer,
            groups,
        })
    }
}

/// Page groups ready for composition
pub struct LayoutPlan<'a> {
    composer: &'a PageComposer,
    groups: Vec<PageGroup>,
}

impl LayoutPlan<'_> {
    pub fn groups(&self) -> &[PageGroup] {
        &self.groups
    }

    pub fn page_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Placement instructions, composed page by page as the iterator advances.
    ///
    /// A page break separates consecutive pages; none follows the last one.
    /// Calling this again starts over from the first page.
    pub fn instructions(&self) -> impl Iterator<Item = LayoutInstruction> + '_ {
        let last = self.groups.len().saturating_sub(1);
        self.groups
            .iter()
            .enumerate()
            .flat_map(move |(index, group)| {
                let mut page = self.composer.compose(group);
                if index < last {
                    page.push(LayoutInstruction::PageBreak);
                }
                page
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CapacityEvaluator, ImageMetadata};

    struct EmptyGroups;

    impl GroupingStrategy for EmptyGroups {
        fn group(&self, images: &[ImageAsset], _capacity: &CapacityEvaluator) -> Vec<PageGroup> {
            vec![PageGroup::new(images.to_vec()), PageGroup::new(Vec::new())]
        }
    }

    fn square(name: &str) -> ImageAsset {
        let meta = ImageMetadata {
            pixel_width: 1000,
            pixel_height: 1000,
            resolution_x: None,
            resolution_y: None,
        };
        ImageAsset::from_metadata(name, &meta, 96.0)
    }

    #[test]
    fn test_malformed_group_is_rejected() {
        let engine = LayoutEngine::with_strategy(LayoutConfig::default(), EmptyGroups).unwrap();
        let result = engine.plan(&[square("a.png")]);
        match result {
            Err(LayoutError::MalformedGroup { index: 1, len: 0 }) => {}
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected MalformedGroup"),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = LayoutConfig {
            heading_reserve_cm: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            LayoutEngine::new(config),
            Err(LayoutError::Config(_))
        ));
    }

    #[test]
    fn test_instructions_restart() {
        let engine = LayoutEngine::new(LayoutConfig::default()).unwrap();
        let images: Vec<ImageAsset> = (0..5).map(|i| square(&format!("{i}.png"))).collect();
        let plan = engine.plan(&images).unwrap();

        let first: Vec<LayoutInstruction> = plan.instructions().collect();
        let second: Vec<LayoutInstruction> = plan.instructions().collect();
        assert_eq!(first, second);
    }
}
