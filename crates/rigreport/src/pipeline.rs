//! The extraction run: flatten, crop each catalog box, map, write.

use std::path::{Path, PathBuf};

use rigreport_core::{
    BBox, PdfError, PersianDisplayNormalizer, RawGrid, ReportBuilder, ReportDocument, TableSettings, TextNormalizer,
};
use rigreport_parse::flatten_file;

use crate::catalog::{FieldCoordinate, load_catalog, select_entries};
use crate::config::RunConfig;
use crate::error::RunError;
use crate::output::{output_path, write_report};
use crate::pdf::Pdf;

/// Something that can hand out the largest ruled table inside a page box.
pub trait TableSource {
    fn page_count(&self) -> usize;

    /// Rows of cell text, `None` for cells a merged cell covers; `Ok(None)`
    /// when the box holds no table.
    fn extract_table(
        &self,
        page_index: usize,
        bbox: BBox,
        settings: &TableSettings,
    ) -> Result<Option<Vec<Vec<Option<String>>>>, PdfError>;
}

impl TableSource for Pdf {
    fn page_count(&self) -> usize {
        Pdf::page_count(self)
    }

    fn extract_table(
        &self,
        page_index: usize,
        bbox: BBox,
        settings: &TableSettings,
    ) -> Result<Option<Vec<Vec<Option<String>>>>, PdfError> {
        Ok(self.page(page_index)?.crop(bbox).extract_table(settings))
    }
}

/// How a [`run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The report was written here.
    Saved(PathBuf),
    /// There was no PDF to extract from.
    MissingInput,
    /// The source could not be flattened, the PDF could not be opened or the
    /// report could not be written.
    Failed,
}

/// Map every catalog entry's table into one report.
///
/// Entries are processed in order; a later entry for the same sheet replaces
/// an earlier one. An entry whose page is missing, whose page cannot be read
/// or whose box holds no table is logged and skipped.
pub fn extract_report(
    source: &dyn TableSource,
    entries: &[FieldCoordinate],
    settings: &TableSettings,
    normalizer: &dyn TextNormalizer,
) -> ReportDocument {
    let mut builder = ReportBuilder::new();
    let page_count = source.page_count();

    for entry in entries {
        let Some(page_index) = entry.page_index().filter(|&i| i < page_count) else {
            tracing::warn!(
                sheet = %entry.sheet_name,
                "Not found page in PDF: {} (document has {page_count} pages)",
                entry.page_number
            );
            continue;
        };

        let table = match source.extract_table(page_index, entry.crop_box(), settings) {
            Ok(Some(table)) => table,
            Ok(None) => {
                tracing::debug!(sheet = %entry.sheet_name, page = entry.page_number, "no table detected");
                continue;
            }
            Err(err) => {
                tracing::warn!(sheet = %entry.sheet_name, page = entry.page_number, "table skipped: {err}");
                continue;
            }
        };

        let grid = normalizer.normalize_grid(RawGrid::from_extracted(&table));
        let kind = builder.apply_named(&entry.sheet_name, &grid);
        tracing::debug!(sheet = %entry.sheet_name, rows = grid.len(), ?kind, "table mapped");
    }

    builder.finish()
}

/// Flatten `source` into `flattened` unless the flattened copy already exists.
///
/// A missing source is logged. A failed flatten is logged and leaves no
/// flattened file.
pub fn flatten_if_needed(source: &Path, flattened: &Path) {
    let source_exists = source.exists();
    if !source_exists {
        tracing::warn!("input file not found: {}", source.display());
    }
    if flattened.exists() {
        tracing::debug!(path = %flattened.display(), "flattened PDF already present");
        return;
    }
    if !source_exists {
        return;
    }

    match flatten_file(source, flattened) {
        Ok(Some(summary)) => tracing::info!(
            drawn = summary.drawn,
            removed = summary.removed,
            "flattened {} into {}",
            source.display(),
            flattened.display()
        ),
        Ok(None) => tracing::warn!("input file not found: {}", source.display()),
        Err(err) => {
            tracing::warn!("cannot flatten {}: {err}", source.display());
            let _ = std::fs::remove_file(flattened);
        }
    }
}

/// Extract `pdf_path` and write `<output_dir>/<stem>_tables.json`.
pub fn extract_file(
    pdf_path: &Path,
    output_dir: &Path,
    entries: &[FieldCoordinate],
    settings: &TableSettings,
    normalizer: &dyn TextNormalizer,
) -> Result<PathBuf, RunError> {
    if !pdf_path.exists() {
        return Err(RunError::MissingInput(pdf_path.to_path_buf()));
    }
    let pdf = Pdf::open_file(pdf_path)?;
    let report = extract_report(&pdf, entries, settings, normalizer);
    let path = output_path(output_dir, pdf_path);
    write_report(&report, &path)?;
    Ok(path)
}

/// The whole run as configured. Nothing here returns an error; failures are
/// logged and reflected in the outcome.
pub fn run(config: &RunConfig) -> RunOutcome {
    if !config.skip_flatten {
        flatten_if_needed(&config.source_pdf, &config.flattened_pdf);
    }
    if !config.flattened_pdf.exists() {
        // a source that is present but produced no flattened copy failed to flatten
        if !config.skip_flatten && config.source_pdf.exists() {
            return RunOutcome::Failed;
        }
        return RunOutcome::MissingInput;
    }

    let catalog = load_catalog(&config.catalog_path);
    let entries = select_entries(&catalog, &config.catalog_key);
    tracing::info!(tables = entries.len(), "extracting {}", config.flattened_pdf.display());

    let normalizer = PersianDisplayNormalizer::new(config.unicode_norm);
    match extract_file(
        &config.flattened_pdf,
        &config.output_dir,
        &entries,
        &config.table_settings,
        &normalizer,
    ) {
        Ok(path) => {
            tracing::info!(
                "Complete Process for {} - Saved to {}",
                file_name(&config.flattened_pdf),
                file_name(&path)
            );
            RunOutcome::Saved(path)
        }
        Err(RunError::MissingInput(_)) => RunOutcome::MissingInput,
        Err(err) => {
            tracing::error!("{err}");
            RunOutcome::Failed
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
