//! Applying layout plans to a document sink

use std::path::{Path, PathBuf};

use album_layout::{HorizontalAlign, LayoutInstruction, LayoutPlan};
use log::{debug, warn};

use crate::sink::DocumentSink;
use crate::types::Result;

/// Font used for the comment line under a document title
pub const COMMENT_FONT: &str = "Arial Black";

/// Size of the comment line under a document title
pub const COMMENT_SIZE_PT: f32 = 16.0;

/// What happened while applying a plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub placed: usize,
    /// Images the sink refused, with the reason
    pub skipped: Vec<(PathBuf, String)>,
    pub page_breaks: usize,
}

impl RenderSummary {
    fn record(&mut self, path: &Path, result: Result<()>) {
        match result {
            Ok(()) => self.placed += 1,
            Err(e) => {
                warn!("skipping image: {}", e);
                self.skipped.push((path.to_path_buf(), e.to_string()));
            }
        }
    }
}

/// Write the title heading and, when it is not blank, the centered comment
pub fn write_header<S: DocumentSink + ?Sized>(sink: &mut S, title: &str, comment: &str) {
    sink.add_heading(title.trim(), 0);
    let comment = comment.trim();
    if !comment.is_empty() {
        sink.add_paragraph(comment, COMMENT_FONT, COMMENT_SIZE_PT, HorizontalAlign::Center);
    }
}

/// Apply every instruction of a plan, in order.
///
/// A rejected image is logged and skipped; it never stops the rest of the plan.
pub fn render_plan<S: DocumentSink + ?Sized>(sink: &mut S, plan: &LayoutPlan<'_>) -> RenderSummary {
    let mut summary = RenderSummary::default();

    for instruction in plan.instructions() {
        match instruction {
            LayoutInstruction::Place(p) => {
                let result = sink.add_image_placement(&p.path, p.width_cm, p.height_cm, p.align);
                summary.record(&p.path, result);
            }
            LayoutInstruction::Row(cells) => {
                let refs = sink.begin_two_column_row();
                for (cell, placement) in refs.into_iter().zip(cells) {
                    if let Some(p) = placement {
                        let result = sink.add_cell_image(cell, &p.path, p.width_cm, p.height_cm);
                        summary.record(&p.path, result);
                    }
                }
            }
            LayoutInstruction::PageBreak => {
                sink.add_page_break();
                summary.page_breaks += 1;
            }
        }
    }

    debug!(
        "rendered {} images, {} skipped, {} page breaks",
        summary.placed,
        summary.skipped.len(),
        summary.page_breaks
    );
    summary
}
