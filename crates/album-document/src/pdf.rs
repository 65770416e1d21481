//! PDF export
//!
//! Blocks flow top to bottom inside the page margins. A block that does not
//! fit in the space left on the page starts a new page; a page break block
//! always does.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use album_layout::HorizontalAlign;
use album_layout::constants::{POINTS_PER_CM, cm_to_pt};
use log::{debug, info, warn};
use printpdf::*;

use crate::document::{AlbumDocument, Block, ImageBlock, PageSetup};
use crate::types::*;

/// Average Helvetica glyph width as a fraction of the font size
const HELVETICA_WIDTH_RATIO: f32 = 0.5;

/// Line height as a multiple of the font size
const LINE_HEIGHT: f32 = 1.2;

/// Space after a heading or paragraph (14 pt)
const TEXT_SPACE_AFTER_CM: f32 = 14.0 / POINTS_PER_CM;

/// Space after an image or row of images
const IMAGE_SPACE_AFTER_CM: f32 = 0.3;

/// Rounding slack when checking whether a block still fits on the page
const FIT_TOLERANCE_CM: f32 = 1e-3;

/// Header font sizes shrink by this factor per step
const HEADER_SHRINK: f32 = 0.9;

/// Smallest header font scale before lines are dropped
const MIN_HEADER_SCALE: f32 = 0.4;

/// Render an album document to a PDF file
pub async fn export_pdf(doc: &AlbumDocument, output_path: impl AsRef<Path>) -> Result<()> {
    let doc = doc.clone();
    let output_path = output_path.as_ref().to_owned();

    // Image decoding and PDF generation are CPU-bound
    let bytes = tokio::task::spawn_blocking(move || generate_pdf_bytes(&doc)).await??;

    tokio::fs::write(&output_path, bytes).await?;
    info!("exported {}", output_path.display());

    Ok(())
}

/// Number of pages in a PDF file
pub async fn pdf_page_count(path: impl AsRef<Path>) -> Result<usize> {
    let bytes = tokio::fs::read(path).await?;
    let pages = tokio::task::spawn_blocking(move || {
        let doc = lopdf::Document::load_mem(&bytes)?;
        Ok::<_, DocumentError>(doc.get_pages().len())
    })
    .await??;
    Ok(pages)
}

fn generate_pdf_bytes(album: &AlbumDocument) -> Result<Vec<u8>> {
    let (title, _) = album.title_and_comment();
    let mut doc = PdfDocument::new(title.as_deref().unwrap_or("Album"));
    let mut images = ImageCache::default();
    let mut flow = PageFlow::new(album.page);

    let (header, body) = album.blocks.split_at(header_len(&album.blocks));
    let runs: Vec<TextRun<'_>> = header.iter().filter_map(text_run).collect();
    flow.header(&runs);

    for block in body {
        match block {
            Block::Heading { .. } | Block::Paragraph { .. } => {
                if let Some(run) = text_run(block) {
                    flow.text(&run);
                }
            }
            Block::Image(image) => {
                flow.reserve(image.height_cm);
                let x = flow.align_x(image.width_cm, 0.0, flow.content_width_cm(), image.align);
                flow.draw_image(&mut doc, &mut images, image, x);
                flow.advance(image.height_cm + IMAGE_SPACE_AFTER_CM);
            }
            Block::Row { cells } => {
                let height = cells.iter().flatten().map(|c| c.height_cm).fold(0.0, f32::max);
                if height <= 0.0 {
                    continue;
                }
                flow.reserve(height);
                let column_width = flow.content_width_cm() / 2.0;
                for (column, cell) in cells.iter().enumerate() {
                    if let Some(image) = cell {
                        let x = flow.align_x(
                            image.width_cm,
                            column as f32 * column_width,
                            column_width,
                            HorizontalAlign::Center,
                        );
                        flow.draw_image(&mut doc, &mut images, image, x);
                    }
                }
                flow.advance(height + IMAGE_SPACE_AFTER_CM);
            }
            Block::PageBreak => flow.new_page(),
        }
    }

    doc.pages = flow.finish();

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    Ok(bytes)
}

/// A heading or paragraph with its nominal style
#[derive(Debug, Clone, Copy)]
struct TextRun<'a> {
    text: &'a str,
    size_pt: f32,
    font: BuiltinFont,
    align: HorizontalAlign,
}

fn text_run(block: &Block) -> Option<TextRun<'_>> {
    match block {
        Block::Heading { text, level } => Some(TextRun {
            text,
            size_pt: heading_size_pt(*level),
            font: BuiltinFont::HelveticaBold,
            align: HorizontalAlign::Left,
        }),
        Block::Paragraph {
            text,
            font,
            size_pt,
            align,
        } => Some(TextRun {
            text,
            size_pt: *size_pt,
            font: builtin_font(font),
            align: *align,
        }),
        _ => None,
    }
}

/// Number of leading text blocks that make up the title area of the first
/// page. Text not followed by an image is laid out as ordinary text.
fn header_len(blocks: &[Block]) -> usize {
    let len = blocks
        .iter()
        .take_while(|block| matches!(block, Block::Heading { .. } | Block::Paragraph { .. }))
        .count();
    match blocks.get(len) {
        Some(Block::Image(_) | Block::Row { .. }) => len,
        _ => 0,
    }
}

fn line_height_cm(size_pt: f32) -> f32 {
    size_pt * LINE_HEIGHT / POINTS_PER_CM
}

/// Height of the header runs at `scale` times their nominal size
fn header_height_cm(runs: &[TextRun<'_>], width_pt: f32, scale: f32) -> f32 {
    runs.iter()
        .map(|run| {
            let size_pt = run.size_pt * scale;
            wrap_text(run.text, size_pt, width_pt).len() as f32 * line_height_cm(size_pt)
                + TEXT_SPACE_AFTER_CM * scale
        })
        .sum()
}

/// Largest font scale, stepping down from 1, at which the header fits
fn header_scale(runs: &[TextRun<'_>], width_pt: f32, budget_cm: f32) -> f32 {
    let mut scale = 1.0;
    while header_height_cm(runs, width_pt, scale) > budget_cm
        && scale * HEADER_SHRINK >= MIN_HEADER_SCALE
    {
        scale *= HEADER_SHRINK;
    }
    scale
}

fn heading_size_pt(level: u8) -> f32 {
    match level {
        0 => 26.0,
        1 => 20.0,
        _ => 16.0,
    }
}

/// Map a document font name onto the closest builtin PDF font
fn builtin_font(name: &str) -> BuiltinFont {
    let lower = name.to_ascii_lowercase();
    if lower.contains("bold") || lower.contains("black") {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}

/// Greedy word wrap using the average glyph width
fn wrap_text(text: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let max_chars = ((max_width_pt / (size_pt * HELVETICA_WIDTH_RATIO)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Embedded images keyed by path; `None` marks a file that failed to load
#[derive(Default)]
struct ImageCache {
    entries: HashMap<PathBuf, Option<(XObjectId, usize, usize)>>,
}

impl ImageCache {
    fn get(&mut self, doc: &mut PdfDocument, path: &Path) -> Option<(XObjectId, usize, usize)> {
        self.entries
            .entry(path.to_path_buf())
            .or_insert_with(|| match load_raw_image(path) {
                Ok(raw) => Some((doc.add_image(&raw), raw.width, raw.height)),
                Err(e) => {
                    warn!("cannot embed {}: {}", path.display(), e);
                    None
                }
            })
            .clone()
    }
}

fn load_raw_image(path: &Path) -> Result<RawImage> {
    let bytes = std::fs::read(path)?;
    let mut warnings = Vec::new();
    RawImage::decode_from_bytes(&bytes, &mut warnings).map_err(DocumentError::Render)
}

/// Top-down cursor over the pages being built
struct PageFlow {
    setup: PageSetup,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    /// Distance below the top margin, in cm
    cursor_cm: f32,
    has_content: bool,
}

impl PageFlow {
    fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor_cm: 0.0,
            has_content: false,
        }
    }

    fn content_width_cm(&self) -> f32 {
        self.setup.content_width_cm()
    }

    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PdfPage::new(
            Mm(self.setup.width_cm * 10.0),
            Mm(self.setup.height_cm * 10.0),
            ops,
        ));
        self.cursor_cm = 0.0;
        self.has_content = false;
    }

    /// Start a new page unless `height_cm` still fits on this one.
    /// Content taller than a whole page is placed on a fresh page anyway.
    fn reserve(&mut self, height_cm: f32) {
        let remaining = self.setup.content_height_cm() - self.cursor_cm;
        if height_cm > remaining + FIT_TOLERANCE_CM && self.has_content {
            self.new_page();
        }
    }

    fn advance(&mut self, height_cm: f32) {
        self.cursor_cm += height_cm;
        self.has_content = true;
    }

    /// Left edge in page cm for content of `width_cm` aligned within a span
    /// starting `offset_cm` from the left margin
    fn align_x(&self, width_cm: f32, offset_cm: f32, span_cm: f32, align: HorizontalAlign) -> f32 {
        let left = self.setup.margins.left_cm + offset_cm;
        match align {
            HorizontalAlign::Left => left,
            HorizontalAlign::Center => left + (span_cm - width_cm) / 2.0,
            HorizontalAlign::Right => left + span_cm - width_cm,
        }
    }

    /// PDF y coordinate (from the page bottom) of a point `below_cm` under the cursor
    fn y_pt(&self, below_cm: f32) -> f32 {
        cm_to_pt(self.setup.height_cm - self.setup.margins.top_cm - self.cursor_cm - below_cm)
    }

    /// Title and comment, kept inside the space the layout leaves above the
    /// images. Text is shrunk to fit; lines that still overflow are dropped.
    fn header(&mut self, runs: &[TextRun<'_>]) {
        if runs.is_empty() {
            return;
        }

        // A stacked pair adds one image gap to the height the layout planned for
        let budget = (self.setup.heading_reserve_cm - IMAGE_SPACE_AFTER_CM).max(0.0);
        let width_pt = cm_to_pt(self.content_width_cm());
        let scale = header_scale(runs, width_pt, budget);
        if scale < 1.0 {
            debug!("header shrunk to {:.0}% to fit {:.2} cm", scale * 100.0, budget);
        }

        for run in runs {
            let size_pt = run.size_pt * scale;
            for line in wrap_text(run.text, size_pt, width_pt) {
                if self.cursor_cm + line_height_cm(size_pt) > budget + FIT_TOLERANCE_CM {
                    warn!("header too long, dropping line \"{}\"", line);
                    continue;
                }
                self.line(&line, size_pt, run.font, run.align);
            }
            self.advance(TEXT_SPACE_AFTER_CM * scale);
        }
        self.cursor_cm = self.cursor_cm.min(budget);
    }

    fn text(&mut self, run: &TextRun<'_>) {
        let width_pt = cm_to_pt(self.content_width_cm());
        for line in wrap_text(run.text, run.size_pt, width_pt) {
            self.reserve(line_height_cm(run.size_pt));
            self.line(&line, run.size_pt, run.font, run.align);
        }
        self.advance(TEXT_SPACE_AFTER_CM);
    }

    /// One line of text at the cursor
    fn line(&mut self, line: &str, size_pt: f32, font: BuiltinFont, align: HorizontalAlign) {
        let width_pt = line.chars().count() as f32 * size_pt * HELVETICA_WIDTH_RATIO;
        let x_cm = self.align_x(
            (width_pt / POINTS_PER_CM).min(self.content_width_cm()),
            0.0,
            self.content_width_cm(),
            align,
        );
        let baseline = self.y_pt(size_pt / POINTS_PER_CM);

        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(cm_to_pt(x_cm)),
                y: Pt(baseline),
            },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            font,
            size: Pt(size_pt),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.to_string())],
            font,
        });
        self.ops.push(Op::EndTextSection);

        self.advance(line_height_cm(size_pt));
    }

    fn draw_image(
        &mut self,
        doc: &mut PdfDocument,
        images: &mut ImageCache,
        image: &ImageBlock,
        x_cm: f32,
    ) {
        let Some((id, px_width, px_height)) = images.get(doc, &image.path) else {
            return;
        };
        if px_width == 0 || px_height == 0 {
            return;
        }

        // At 72 dpi one pixel is one point
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(cm_to_pt(x_cm))),
                translate_y: Some(Pt(self.y_pt(image.height_cm))),
                scale_x: Some(cm_to_pt(image.width_cm) / px_width as f32),
                scale_y: Some(cm_to_pt(image.height_cm) / px_height as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        });
    }

    fn finish(mut self) -> Vec<PdfPage> {
        if !self.ops.is_empty() || self.has_content || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}
