use rigreport::{RunConfig, RunOutcome};

use crate::cli::ExtractArgs;

/// Build the run configuration from the flags, falling back to the defaults.
pub fn config_from_args(args: &ExtractArgs) -> RunConfig {
    let mut config = RunConfig::default();
    if let Some(pdf) = &args.pdf {
        config.source_pdf = pdf.clone();
        // keep the flattened copy next to the source unless told otherwise
        if args.flattened.is_none() {
            config.flattened_pdf = flattened_name(pdf);
        }
    }
    if let Some(flattened) = &args.flattened {
        config.flattened_pdf = flattened.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(catalog) = &args.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(key) = &args.catalog_key {
        config.catalog_key = key.clone();
    }
    if let Some(norm) = args.unicode_norm {
        config.unicode_norm = norm.into();
    }
    config.skip_flatten = args.no_flatten;
    config
}

/// `<dir>/<stem>_flatten.pdf`
fn flattened_name(pdf: &std::path::Path) -> std::path::PathBuf {
    let stem = pdf.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    pdf.with_file_name(format!("{stem}_flatten.pdf"))
}

pub fn run(args: &ExtractArgs) -> Result<(), i32> {
    let config = config_from_args(args);
    match rigreport::run(&config) {
        RunOutcome::Saved(path) => {
            println!("{}", path.display());
            Ok(())
        }
        RunOutcome::MissingInput => {
            eprintln!("Error: input file not found: {}", config.source_pdf.display());
            Err(1)
        }
        RunOutcome::Failed => {
            eprintln!("Error: extraction failed for {}", config.source_pdf.display());
            Err(1)
        }
    }
}
