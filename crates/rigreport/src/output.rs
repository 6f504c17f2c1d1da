//! Writing the report JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rigreport_core::ReportDocument;

use crate::error::RunError;

/// `<output_dir>/<stem>_tables.json`, where `stem` is the PDF file name
/// without its last extension.
pub fn output_path(output_dir: &Path, pdf: &Path) -> PathBuf {
    let stem = pdf.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    output_dir.join(format!("{stem}_tables.json"))
}

/// Write `report` as pretty-printed UTF-8 JSON, creating the directory if needed.
///
/// On failure no file is left behind.
pub fn write_report(report: &ReportDocument, path: &Path) -> Result<(), RunError> {
    let write_err = |source| RunError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }

    let file = File::create(path).map_err(write_err)?;
    let result = write_json(report, file, path);
    if result.is_err() {
        let _ = std::fs::remove_file(path);
    }
    result
}

fn write_json(report: &ReportDocument, file: File, path: &Path) -> Result<(), RunError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|source| RunError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").and_then(|()| writer.flush()).map_err(|source| RunError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigreport_core::ReportBuilder;

    #[test]
    fn output_name_drops_last_extension() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("in/DCR O3 1404 1007_flatten.pdf")),
            Path::new("out").join("DCR O3 1404 1007_flatten_tables.json")
        );
        assert_eq!(
            output_path(Path::new("out"), Path::new("a.b.pdf")),
            Path::new("out").join("a.b_tables.json")
        );
    }

    #[test]
    fn writes_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("r_tables.json");
        write_report(&ReportBuilder::new().finish(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"Header\": {"));
        assert!(text.contains("\"تاریخ\": \"\""), "non-ASCII kept verbatim");
    }

    #[test]
    fn unwritable_target_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should go
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        let err = write_report(&ReportBuilder::new().finish(), &path).unwrap_err();
        assert!(matches!(err, RunError::Write { .. }));
        assert!(path.is_dir());
    }
}
