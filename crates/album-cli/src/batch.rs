//! Per-folder document building and PDF export

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use album_document::{
    AlbumDocument, DocumentSink, FileImageSource, RenderSummary, copy_document, document_path,
    document_stem, export_pdf, is_document_file, load_document, pdf_page_count, render_plan,
    save_document, write_header,
};
use album_layout::{DimensionResolver, GroupingStrategy, LayoutEngine};
use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::prompt::Prompter;
use crate::report::BatchReport;

/// Extensions accepted as images, compared case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Supported images directly inside `folder`, unique by file name, sorted by name
pub async fn collect_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(folder)
        .await
        .with_context(|| format!("reading {}", folder.display()))?;

    let mut seen: HashSet<OsString> = HashSet::new();
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file()
            && is_supported_image(&path)
            && seen.insert(entry.file_name())
        {
            images.push(path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Subfolders of `root`, sorted by name, leaving out `exclude` and hidden folders
pub async fn list_folders(root: &Path, exclude: &[&Path]) -> Result<Vec<PathBuf>> {
    let mut excluded = Vec::new();
    for path in exclude {
        if let Ok(canonical) = tokio::fs::canonicalize(path).await {
            excluded.push(canonical);
        }
    }

    let mut entries = tokio::fs::read_dir(root)
        .await
        .with_context(|| format!("reading {}", root.display()))?;

    let mut folders = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let canonical = tokio::fs::canonicalize(&path).await?;
        if !excluded.contains(&canonical) {
            folders.push(path);
        }
    }

    folders.sort();
    Ok(folders)
}

/// What happened to one folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderOutcome {
    Created,
    Updated,
    NoNewImages,
    Skipped,
}

/// Builds and updates the documents of one run
pub struct Batch<G> {
    engine: LayoutEngine<G>,
    documents_dir: PathBuf,
}

impl<G: GroupingStrategy> Batch<G> {
    pub fn new(engine: LayoutEngine<G>, documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            documents_dir: documents_dir.into(),
        }
    }

    /// Process every folder in order. A failing folder is logged and
    /// recorded; the others still run.
    pub async fn run(
        &self,
        folders: &[PathBuf],
        prompter: &mut dyn Prompter,
        report: &mut BatchReport,
    ) {
        for folder in folders {
            let name = folder_name(folder);
            match self.process_folder(folder, prompter, report).await {
                Ok(FolderOutcome::Created) => report.created.push(name),
                Ok(FolderOutcome::Updated) => report.updated.push(name),
                Ok(FolderOutcome::NoNewImages) => report.no_new_images.push(name),
                Ok(FolderOutcome::Skipped) => report.skipped.push(name),
                Err(e) => {
                    error!("folder {} failed: {:#}", name, e);
                    report.failed.push((name, format!("{:#}", e)));
                }
            }
        }
    }

    pub async fn process_folder(
        &self,
        folder: &Path,
        prompter: &mut dyn Prompter,
        report: &mut BatchReport,
    ) -> Result<FolderOutcome> {
        let name = folder_name(folder);
        let images = collect_images(folder).await?;
        let doc_path = document_path(folder)
            .with_context(|| format!("no usable document name for {}", folder.display()))?;

        if tokio::fs::try_exists(&doc_path).await? {
            let mut doc = load_document(&doc_path)
                .await
                .with_context(|| format!("loading {}", doc_path.display()))?;
            let (title, comment) = doc.title_and_comment();
            info!(
                "existing document {}: title {:?}, comment {:?}",
                doc_path.display(),
                title,
                comment
            );

            let placed = doc.image_file_names();
            let new_images: Vec<PathBuf> = images
                .into_iter()
                .filter(|path| path.file_name().is_some_and(|n| !placed.contains(n)))
                .collect();

            let outcome = if new_images.is_empty() {
                info!("no new images for {}", name);
                FolderOutcome::NoNewImages
            } else {
                info!("adding {} new images to {}", new_images.len(), name);
                if doc.images().next().is_some() {
                    doc.add_page_break();
                }
                self.lay_out(&mut doc, new_images, report).await?;
                save_document(&doc, &doc_path).await?;
                FolderOutcome::Updated
            };

            copy_document(&doc_path, &self.documents_dir).await?;
            return Ok(outcome);
        }

        if images.is_empty() {
            return Ok(FolderOutcome::Skipped);
        }

        info!("processing folder {} ({} images)", name, images.len());
        let header = prompter
            .header(&name)
            .context("reading title and comment")?;

        let config = self.engine.config();
        let mut doc = AlbumDocument::from_config(config);
        doc.set_page_margins(config.margins);
        write_header(&mut doc, &header.title, &header.comment);
        self.lay_out(&mut doc, images, report).await?;

        save_document(&doc, &doc_path).await?;
        info!("created {}", doc_path.display());
        copy_document(&doc_path, &self.documents_dir).await?;
        Ok(FolderOutcome::Created)
    }

    /// Resolve, plan and render `images` at the end of `doc`
    async fn lay_out(
        &self,
        doc: &mut AlbumDocument,
        images: Vec<PathBuf>,
        report: &mut BatchReport,
    ) -> Result<RenderSummary> {
        let default_dpi = self.engine.config().default_dpi;

        // Header probing reads every file
        let (assets, failures) = tokio::task::spawn_blocking(move || {
            let mut resolver = DimensionResolver::new(FileImageSource, default_dpi);
            let assets = resolver.resolve_all(&images);
            (assets, resolver.take_failures())
        })
        .await?;
        report.decode_fallbacks.extend(failures);

        let plan = self.engine.plan(&assets)?;
        let summary = render_plan(doc, &plan);
        report
            .skipped_placements
            .extend(summary.skipped.iter().cloned());
        Ok(summary)
    }
}

/// Export every document in `documents_dir` to `<pdf_dir>/<name>.pdf`
pub async fn export_all(
    documents_dir: &Path,
    pdf_dir: &Path,
    report: &mut BatchReport,
) -> Result<()> {
    let mut entries = tokio::fs::read_dir(documents_dir)
        .await
        .with_context(|| format!("reading {}", documents_dir.display()))?;

    let mut documents = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_document_file(&path) {
            documents.push(path);
        }
    }
    documents.sort();

    for path in documents {
        let Some(stem) = document_stem(&path) else {
            continue;
        };
        let pdf_path = pdf_dir.join(format!("{stem}.pdf"));

        match export_one(&path, &pdf_path).await {
            Ok(pages) => {
                info!("converted {} -> {} ({} pages)", path.display(), pdf_path.display(), pages);
                report.exported.push((pdf_path, pages));
            }
            Err(e) => {
                warn!("cannot export {}: {:#}", path.display(), e);
                report.export_failures.push((path, format!("{:#}", e)));
            }
        }
    }
    Ok(())
}

async fn export_one(document: &Path, pdf_path: &Path) -> Result<usize> {
    let doc = load_document(document).await?;
    export_pdf(&doc, pdf_path).await?;
    Ok(pdf_page_count(pdf_path).await?)
}

fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}
