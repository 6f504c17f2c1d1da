use std::collections::BTreeMap;
use std::path::Path;

use rigreport::{
    BBox, IdentityNormalizer, PersianDisplayNormalizer, Pdf, RawGrid, TableSettings, TextNormalizer, UnicodeNorm,
};

fn open_pdf(file: &Path) -> Result<Pdf, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Pdf::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Rows as `{"<column>": "<text>"}` objects, keyed by the column index that
/// survived pruning.
fn grid_json(grid: &RawGrid) -> serde_json::Value {
    let rows = grid
        .rows()
        .iter()
        .map(|row| row.iter().map(|(c, v)| (c.to_string(), v)).collect::<BTreeMap<_, _>>())
        .collect::<Vec<_>>();
    serde_json::json!(rows)
}

pub fn run(file: &Path, page: usize, bbox: [f64; 4], raw: bool, unicode_norm: UnicodeNorm) -> Result<(), i32> {
    let pdf = open_pdf(file)?;

    let page_count = pdf.page_count();
    if page == 0 || page > page_count {
        eprintln!("Error: page {page} out of range (document has {page_count} pages)");
        return Err(1);
    }

    let page = pdf.page(page - 1).map_err(|e| {
        eprintln!("Error: failed to read page {page}: {e}");
        1
    })?;
    let table = page
        .crop(BBox::from_catalog(bbox))
        .extract_table(&TableSettings::default());

    let grid = match table {
        Some(table) => {
            let grid = RawGrid::from_extracted(&table);
            if raw {
                IdentityNormalizer.normalize_grid(grid)
            } else {
                PersianDisplayNormalizer::new(unicode_norm).normalize_grid(grid)
            }
        }
        None => {
            tracing::debug!("no table detected in {bbox:?}");
            RawGrid::default()
        }
    };

    match serde_json::to_string_pretty(&grid_json(&grid)) {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Err(1)
        }
    }
}
