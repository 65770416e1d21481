pub mod constants;
pub mod layout;
mod config;
mod plan;
mod types;

pub use config::LayoutConfig;
pub use layout::{
    BoundingBox, CapacityEvaluator, DimensionResolver, GreedyGrouper, GroupingStrategy,
    ImageAsset, ImageMetadata, ImageSource, LayoutInstruction, PageComposer, PageGroup,
    PairArrangement, PairGrouper, Placement, Slot, scale_image, scale_to_box,
};
pub use plan::{LayoutEngine, LayoutPlan};
pub use types::*;
