use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rigreport::UnicodeNorm;

/// Flatten drilling report PDFs and extract their tables to JSON.
#[derive(Debug, Parser)]
#[command(name = "rigreport", about, version)]
pub struct Cli {
    /// Defaults to `extract` with every option at its default.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Flatten the report and extract every catalog table into one JSON file
    Extract(ExtractArgs),

    /// Bake form-field appearances into page content and drop the form
    Flatten {
        /// PDF with fillable fields
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the flattened PDF
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Print the table inside one catalog box as JSON, for calibrating coordinates
    Grid {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// 1-based page number
        #[arg(long)]
        page: usize,

        /// Catalog-style box: top,left,bottom,right
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: [f64; 4],

        /// Print cell text as extracted, without display correction
        #[arg(long)]
        raw: bool,

        /// Unicode normalization applied after reordering
        #[arg(long, value_enum, default_value_t = UnicodeNormArg::Nfkc)]
        unicode_norm: UnicodeNormArg,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExtractArgs {
    /// Source PDF with fillable fields
    #[arg(long, value_name = "FILE")]
    pub pdf: Option<PathBuf>,

    /// Flattened copy, created from --pdf when missing
    #[arg(long, value_name = "FILE")]
    pub flattened: Option<PathBuf>,

    /// Directory for `<name>_tables.json`
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Coordinate catalog JSON
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Top-level catalog key holding the table list
    #[arg(long)]
    pub catalog_key: Option<String>,

    /// Extract from --flattened as is, without flattening first
    #[arg(long)]
    pub no_flatten: bool,

    /// Unicode normalization applied after reordering
    #[arg(long, value_enum)]
    pub unicode_norm: Option<UnicodeNormArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnicodeNormArg {
    None,
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl From<UnicodeNormArg> for UnicodeNorm {
    fn from(arg: UnicodeNormArg) -> Self {
        match arg {
            UnicodeNormArg::None => UnicodeNorm::None,
            UnicodeNormArg::Nfc => UnicodeNorm::Nfc,
            UnicodeNormArg::Nfd => UnicodeNorm::Nfd,
            UnicodeNormArg::Nfkc => UnicodeNorm::Nfkc,
            UnicodeNormArg::Nfkd => UnicodeNorm::Nfkd,
        }
    }
}

/// Parse `top,left,bottom,right`.
fn parse_bbox(value: &str) -> Result<[f64; 4], String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {e}", p.trim()))
        })
        .collect::<Result<_, _>>()?;
    parts
        .try_into()
        .map_err(|parts: Vec<f64>| format!("expected 4 comma-separated numbers, got {}", parts.len()))
}
