//! Partitioning images into page groups
//!
//! Strategies never reorder images: concatenating the groups they return
//! reproduces the input sequence.

use log::debug;

use crate::constants::{IMAGES_PER_UNIT, MAX_IMAGES_PER_PAGE};

use super::{CapacityEvaluator, ImageAsset, PageGroup};

/// A way of splitting an ordered image sequence into pages
pub trait GroupingStrategy {
    /// Partition `images` into page groups, in order
    fn group(&self, images: &[ImageAsset], capacity: &CapacityEvaluator) -> Vec<PageGroup>;
}

impl<T: GroupingStrategy + ?Sized> GroupingStrategy for Box<T> {
    fn group(&self, images: &[ImageAsset], capacity: &CapacityEvaluator) -> Vec<PageGroup> {
        (**self).group(images, capacity)
    }
}

/// Greedy grouping: prefer four per page, fall back to two, then one.
///
/// Images left over at the end are merged into the previous page when the
/// merged group still fits. No backtracking is done.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyGrouper;

impl GroupingStrategy for GreedyGrouper {
    fn group(&self, images: &[ImageAsset], capacity: &CapacityEvaluator) -> Vec<PageGroup> {
        let mut groups: Vec<PageGroup> = Vec::new();
        let mut rest = images;

        while rest.len() >= MAX_IMAGES_PER_PAGE {
            let take = if capacity.fits(&rest[..MAX_IMAGES_PER_PAGE]) {
                MAX_IMAGES_PER_PAGE
            } else if capacity.fits(&rest[..IMAGES_PER_UNIT]) {
                IMAGES_PER_UNIT
            } else {
                1
            };
            debug!("grouping: {} images on page {}", take, groups.len() + 1);
            groups.push(PageGroup::new(rest[..take].to_vec()));
            rest = &rest[take..];
        }

        match rest.len() {
            0 => {}
            1 | 2 => push_tail(&mut groups, rest, capacity),
            _ => {
                if capacity.fits(rest) {
                    groups.push(PageGroup::new(rest.to_vec()));
                } else {
                    let (pair, single) = rest.split_at(IMAGES_PER_UNIT);
                    groups.push(PageGroup::new(pair.to_vec()));
                    groups.push(PageGroup::new(single.to_vec()));
                }
            }
        }

        groups
    }
}

/// Merge one or two trailing images into the previous page when the merged
/// group still fits; otherwise they get a page of their own.
fn push_tail(groups: &mut Vec<PageGroup>, tail: &[ImageAsset], capacity: &CapacityEvaluator) {
    match groups.last_mut() {
        Some(previous) if previous.len() + tail.len() <= MAX_IMAGES_PER_PAGE => {
            let mut merged: Vec<ImageAsset> = previous.images().to_vec();
            merged.extend_from_slice(tail);
            if capacity.fits(&merged) {
                debug!("grouping: merged {} trailing images into last page", tail.len());
                previous.extend(PageGroup::new(tail.to_vec()));
            } else {
                groups.push(PageGroup::new(tail.to_vec()));
            }
        }
        _ => groups.push(PageGroup::new(tail.to_vec())),
    }
}

/// Fixed pairs: two images per page, the last page holding one if the count is odd
#[derive(Debug, Clone, Copy, Default)]
pub struct PairGrouper;

impl GroupingStrategy for PairGrouper {
    fn group(&self, images: &[ImageAsset], _capacity: &CapacityEvaluator) -> Vec<PageGroup> {
        images
            .chunks(IMAGES_PER_UNIT)
            .map(|chunk| PageGroup::new(chunk.to_vec()))
            .collect()
    }
}
