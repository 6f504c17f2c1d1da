use std::path::Path;

pub fn run(input: &Path, output: &Path) -> Result<(), i32> {
    match rigreport::flatten_file(input, output) {
        Ok(Some(summary)) => {
            println!(
                "{}: {} page(s), {} appearance(s) drawn, {} annotation(s) removed",
                output.display(),
                summary.pages,
                summary.drawn,
                summary.removed
            );
            Ok(())
        }
        Ok(None) => {
            eprintln!("Error: file not found: {}", input.display());
            Err(1)
        }
        Err(e) => {
            let _ = std::fs::remove_file(output);
            eprintln!("Error: failed to flatten PDF: {e}");
            Err(1)
        }
    }
}
