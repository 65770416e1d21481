mod document;
mod io;
mod pdf;
mod render;
mod sink;
mod source;
mod types;

pub use document::{AlbumDocument, Block, ImageBlock, PageSetup};
pub use io::{
    DOCUMENT_SUFFIX, copy_document, document_path, document_stem, is_document_file,
    load_document, save_document,
};
pub use pdf::{export_pdf, pdf_page_count};
pub use render::{COMMENT_FONT, COMMENT_SIZE_PT, RenderSummary, render_plan, write_header};
pub use sink::{CellRef, DocumentSink};
pub use source::{FileImageSource, probe_dimensions, read_resolution};
pub use types::*;
