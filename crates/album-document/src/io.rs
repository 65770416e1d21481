use std::path::{Path, PathBuf};

use crate::document::AlbumDocument;
use crate::types::*;

/// Suffix of every album document file
pub const DOCUMENT_SUFFIX: &str = ".album.json";

/// Where the document for a photo folder lives: `<folder>/<folder name>.album.json`
pub fn document_path(folder: &Path) -> Option<PathBuf> {
    let name = folder.file_name()?.to_str()?;
    Some(folder.join(format!("{name}{DOCUMENT_SUFFIX}")))
}

pub fn is_document_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > DOCUMENT_SUFFIX.len() && n.ends_with(DOCUMENT_SUFFIX))
}

/// Document name without the suffix, used to name the exported PDF
pub fn document_stem(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.strip_suffix(DOCUMENT_SUFFIX)
}

/// Load an album document
pub async fn load_document(path: impl AsRef<Path>) -> Result<AlbumDocument> {
    let bytes = tokio::fs::read(path).await?;
    let doc = serde_json::from_slice(&bytes)?;
    Ok(doc)
}

/// Save an album document as pretty JSON
pub async fn save_document(doc: &AlbumDocument, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_vec_pretty(doc)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Copy a document file into `dir`, keeping its name. Returns the new path.
pub async fn copy_document(path: impl AsRef<Path>, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let target = dir.as_ref().join(name);
    tokio::fs::copy(path, &target).await?;
    Ok(target)
}
