use std::path::Path;

use album_layout::{HorizontalAlign, PageMargins};

use crate::types::Result;

/// Handle to one cell of a two-column row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub block: usize,
    pub column: usize,
}

/// A document that layout output can be written into.
///
/// Image insertions may be rejected; callers are expected to log the error
/// and carry on with the next image.
pub trait DocumentSink {
    fn set_page_margins(&mut self, margins: PageMargins);

    fn add_heading(&mut self, text: &str, level: u8);

    fn add_paragraph(&mut self, text: &str, font: &str, size_pt: f32, align: HorizontalAlign);

    fn add_image_placement(
        &mut self,
        path: &Path,
        width_cm: f32,
        height_cm: f32,
        align: HorizontalAlign,
    ) -> Result<()>;

    /// Append an empty two-column row and return its cells, left first
    fn begin_two_column_row(&mut self) -> [CellRef; 2];

    fn add_cell_image(
        &mut self,
        cell: CellRef,
        path: &Path,
        width_cm: f32,
        height_cm: f32,
    ) -> Result<()>;

    fn add_page_break(&mut self);
}
