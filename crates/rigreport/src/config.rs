//! Run configuration.

use std::path::PathBuf;

use rigreport_core::{TableSettings, UnicodeNorm};

/// Catalog key holding the report's table list. The `ـ` is U+0640 ARABIC TATWEEL.
pub const DEFAULT_CATALOG_KEY: &str = "tables_metadataـDCR";

/// Everything one extraction run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// The report as received, with fillable form fields.
    pub source_pdf: PathBuf,
    /// Where the flattened copy is written and read from.
    pub flattened_pdf: PathBuf,
    pub output_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub catalog_key: String,
    /// Skip flattening and extract from `flattened_pdf` as is.
    pub skip_flatten: bool,
    pub table_settings: TableSettings,
    pub unicode_norm: UnicodeNorm,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source_pdf: PathBuf::from("DCR O3 1404 1007.pdf"),
            flattened_pdf: PathBuf::from("DCR O3 1404 1007_flatten.pdf"),
            output_dir: PathBuf::from("./extract_tables_dcr"),
            catalog_path: PathBuf::from("coordinates_points.json"),
            catalog_key: DEFAULT_CATALOG_KEY.to_string(),
            skip_flatten: false,
            table_settings: TableSettings::default(),
            unicode_norm: UnicodeNorm::default(),
        }
    }
}
