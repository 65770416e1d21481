//! End-of-run summary

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use album_layout::DecodeError;

/// Everything worth telling the operator once the batch is over
#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    /// Existing documents that had nothing new to add
    pub no_new_images: Vec<String>,
    /// Folders with neither a document nor images
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub decode_fallbacks: Vec<DecodeError>,
    pub skipped_placements: Vec<(PathBuf, String)>,
    /// Exported PDFs with their page counts
    pub exported: Vec<(PathBuf, usize)>,
    pub export_failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.created.len() + self.updated.len() + self.no_new_images.len()
    }

    /// One (category, item, detail) row per reported fact
    pub fn rows(&self) -> Vec<[String; 3]> {
        let mut rows = Vec::new();
        let plain = |rows: &mut Vec<[String; 3]>, category: &str, items: &[String]| {
            for item in items {
                rows.push([category.to_string(), item.clone(), String::new()]);
            }
        };
        let with_path = |rows: &mut Vec<[String; 3]>, category: &str, path: &Path, detail: String| {
            rows.push([category.to_string(), path.display().to_string(), detail]);
        };

        plain(&mut rows, "created", &self.created);
        plain(&mut rows, "updated", &self.updated);
        plain(&mut rows, "no_new_images", &self.no_new_images);
        plain(&mut rows, "skipped", &self.skipped);
        for (folder, reason) in &self.failed {
            rows.push(["failed".to_string(), folder.clone(), reason.clone()]);
        }
        for failure in &self.decode_fallbacks {
            with_path(&mut rows, "decode_fallback", &failure.path, failure.reason.clone());
        }
        for (path, reason) in &self.skipped_placements {
            with_path(&mut rows, "skipped_placement", path, reason.clone());
        }
        for (path, pages) in &self.exported {
            with_path(&mut rows, "exported", path, pages.to_string());
        }
        for (path, reason) in &self.export_failures {
            with_path(&mut rows, "export_failed", path, reason.clone());
        }
        rows
    }

    /// Human readable summary
    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "\n=== Summary ===")?;
        writeln!(out, "Folders processed: {}", self.processed())?;
        list(out, "New documents", &self.created)?;
        list(out, "Updated documents", &self.updated)?;
        list(out, "Documents with no new images", &self.no_new_images)?;
        list(out, "Skipped folders (no images)", &self.skipped)?;

        if !self.failed.is_empty() {
            writeln!(out, "Failed folders: {}", self.failed.len())?;
            for (folder, reason) in &self.failed {
                writeln!(out, "  - {}: {}", folder, reason)?;
            }
        }
        if !self.decode_fallbacks.is_empty() {
            writeln!(
                out,
                "Images placed with placeholder size: {}",
                self.decode_fallbacks.len()
            )?;
            for failure in &self.decode_fallbacks {
                writeln!(out, "  - {}", failure)?;
            }
        }
        if !self.skipped_placements.is_empty() {
            writeln!(out, "Images not placed: {}", self.skipped_placements.len())?;
            for (path, reason) in &self.skipped_placements {
                writeln!(out, "  - {}: {}", path.display(), reason)?;
            }
        }

        writeln!(out, "PDFs exported: {}", self.exported.len())?;
        for (path, pages) in &self.exported {
            writeln!(out, "  - {} ({} pages)", path.display(), pages)?;
        }
        if !self.export_failures.is_empty() {
            writeln!(out, "PDF exports failed: {}", self.export_failures.len())?;
            for (path, reason) in &self.export_failures {
                writeln!(out, "  - {}: {}", path.display(), reason)?;
            }
        }
        Ok(())
    }

    /// Write the report rows as CSV with a header line
    pub fn write_csv(&self, path: impl AsRef<Path>) -> csv::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["category", "item", "detail"])?;
        for row in self.rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn list(out: &mut impl Write, label: &str, items: &[String]) -> io::Result<()> {
    writeln!(out, "{}: {}", label, items.len())?;
    for item in items {
        writeln!(out, "  - {}", item)?;
    }
    Ok(())
}
