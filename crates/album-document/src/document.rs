//! The editable album document
//!
//! A document is page setup plus an ordered list of blocks. It is saved as
//! JSON next to the photos it was built from and exported to PDF on demand.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use album_layout::constants::DEFAULT_HEADING_RESERVE_CM;
use album_layout::{HorizontalAlign, LayoutConfig, PageMargins};
use serde::{Deserialize, Serialize};

use crate::sink::{CellRef, DocumentSink};
use crate::types::*;

/// Paper size and margins, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width_cm: f32,
    pub height_cm: f32,
    pub margins: PageMargins,
    /// Height above the images kept for the title and comment
    #[serde(default = "default_heading_reserve")]
    pub heading_reserve_cm: f32,
}

fn default_heading_reserve() -> f32 {
    DEFAULT_HEADING_RESERVE_CM
}

impl PageSetup {
    pub fn from_config(config: &LayoutConfig) -> Self {
        let (width_cm, height_cm) = config.page_dimensions_cm();
        Self {
            width_cm,
            height_cm,
            margins: config.margins,
            heading_reserve_cm: config.heading_reserve_cm,
        }
    }

    pub fn content_width_cm(&self) -> f32 {
        self.width_cm - self.margins.left_cm - self.margins.right_cm
    }

    pub fn content_height_cm(&self) -> f32 {
        self.height_cm - self.margins.top_cm - self.margins.bottom_cm
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

/// A placed image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub path: PathBuf,
    pub width_cm: f32,
    pub height_cm: f32,
    #[serde(default)]
    pub align: HorizontalAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Level 0 is the document title
    Heading { text: String, level: u8 },
    Paragraph {
        text: String,
        font: String,
        size_pt: f32,
        align: HorizontalAlign,
    },
    Image(ImageBlock),
    /// Two columns; a cell may stay empty
    Row { cells: [Option<ImageBlock>; 2] },
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlbumDocument {
    pub page: PageSetup,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl AlbumDocument {
    pub fn new(page: PageSetup) -> Self {
        Self {
            page,
            blocks: Vec::new(),
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(PageSetup::from_config(config))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every placed image, in document order, row cells included
    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Image(image) => vec![image],
            Block::Row { cells } => cells.iter().flatten().collect(),
            _ => Vec::new(),
        })
    }

    /// File names of the images already in the document
    pub fn image_file_names(&self) -> HashSet<&OsStr> {
        self.images()
            .filter_map(|image| image.path.file_name())
            .collect()
    }

    /// Detect the title and comment of an existing document.
    ///
    /// The title is the first heading, or failing that the first non-empty
    /// centered paragraph. The comment is the next non-empty centered
    /// paragraph after the title.
    pub fn title_and_comment(&self) -> (Option<String>, Option<String>) {
        let mut title = None;
        let mut comment = None;

        for block in &self.blocks {
            match block {
                Block::Heading { text, .. } => {
                    if title.is_none() {
                        title = Some(text.trim().to_string());
                    }
                }
                Block::Paragraph {
                    text,
                    align: HorizontalAlign::Center,
                    ..
                } if !text.trim().is_empty() => {
                    if title.is_none() {
                        title = Some(text.trim().to_string());
                    } else {
                        comment = Some(text.trim().to_string());
                        break;
                    }
                }
                _ => {}
            }
        }

        (title, comment)
    }
}

impl DocumentSink for AlbumDocument {
    fn set_page_margins(&mut self, margins: PageMargins) {
        self.page.margins = margins;
    }

    fn add_heading(&mut self, text: &str, level: u8) {
        self.blocks.push(Block::Heading {
            text: text.to_string(),
            level,
        });
    }

    fn add_paragraph(&mut self, text: &str, font: &str, size_pt: f32, align: HorizontalAlign) {
        self.blocks.push(Block::Paragraph {
            text: text.to_string(),
            font: font.to_string(),
            size_pt,
            align,
        });
    }

    fn add_image_placement(
        &mut self,
        path: &Path,
        width_cm: f32,
        height_cm: f32,
        align: HorizontalAlign,
    ) -> Result<()> {
        let image = checked_image(path, width_cm, height_cm, align)?;
        self.blocks.push(Block::Image(image));
        Ok(())
    }

    fn begin_two_column_row(&mut self) -> [CellRef; 2] {
        let block = self.blocks.len();
        self.blocks.push(Block::Row {
            cells: [None, None],
        });
        [CellRef { block, column: 0 }, CellRef { block, column: 1 }]
    }

    fn add_cell_image(
        &mut self,
        cell: CellRef,
        path: &Path,
        width_cm: f32,
        height_cm: f32,
    ) -> Result<()> {
        let image = checked_image(path, width_cm, height_cm, HorizontalAlign::Center)?;
        match self.blocks.get_mut(cell.block) {
            Some(Block::Row { cells }) if cell.column < cells.len() => {
                cells[cell.column] = Some(image);
                Ok(())
            }
            _ => Err(DocumentError::Placement {
                path: path.to_path_buf(),
                reason: format!(
                    "block {} column {} is not a two-column row cell",
                    cell.block, cell.column
                ),
            }),
        }
    }

    fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }
}

fn checked_image(
    path: &Path,
    width_cm: f32,
    height_cm: f32,
    align: HorizontalAlign,
) -> Result<ImageBlock> {
    let rejected = |reason: String| DocumentError::Placement {
        path: path.to_path_buf(),
        reason,
    };

    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !(valid(width_cm) && valid(height_cm)) {
        return Err(rejected(format!(
            "invalid size {}x{} cm",
            width_cm, height_cm
        )));
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(rejected("not a regular file".to_string())),
        Err(e) => return Err(rejected(e.to_string())),
    }

    Ok(ImageBlock {
        path: path.to_path_buf(),
        width_cm,
        height_cm,
        align,
    })
}
