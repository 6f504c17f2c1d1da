//! The coordinate catalog: where each report table sits on the page.
//!
//! The catalog is a JSON object whose configured key holds a list of
//! [`FieldCoordinate`] entries. Loading never fails; anything unreadable
//! yields no entries and a log line.

use std::path::Path;

use rigreport_core::BBox;
use serde::Deserialize;
use serde_json::Value;

use crate::error::RunError;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldCoordinate {
    /// 1-based page number.
    pub page_number: usize,
    pub sheet_name: String,
    /// `(top, left, bottom, right)` in page units.
    pub coordinates: [f64; 4],
}

impl FieldCoordinate {
    /// The crop box `(x0, top, x1, bottom)` for this entry.
    pub fn crop_box(&self) -> BBox {
        BBox::from_catalog(self.coordinates)
    }

    /// 0-based page index, or `None` for page 0.
    pub fn page_index(&self) -> Option<usize> {
        self.page_number.checked_sub(1)
    }
}

/// Read and parse the catalog file.
pub fn read_catalog(path: &Path) -> Result<Value, RunError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| RunError::CatalogJson {
        path: path.to_path_buf(),
        source,
    })
}

/// [`read_catalog`], with any failure logged and replaced by an empty list.
pub fn load_catalog(path: &Path) -> Value {
    match read_catalog(path) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("{err}");
            Value::Array(Vec::new())
        }
    }
}

/// The entries listed under `key`.
///
/// A catalog that is not an object, a missing key or a value that is not a
/// list all mean there is nothing to process. Entries that do not have the
/// expected shape, and entries for page 0, are skipped.
pub fn select_entries(catalog: &Value, key: &str) -> Vec<FieldCoordinate> {
    let Some(value) = catalog.get(key) else {
        tracing::warn!(key, "catalog has no table list");
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        tracing::warn!(key, "catalog table list is not an array");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match FieldCoordinate::deserialize(item) {
            Ok(entry) if entry.page_number == 0 => {
                tracing::warn!(index = i, sheet = %entry.sheet_name, "catalog entry has page 0, skipped");
                None
            }
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(index = i, "malformed catalog entry skipped: {err}");
                None
            }
        })
        .collect()
}
