mod cli;
mod extract_cmd;
mod flatten_cmd;
mod grid_cmd;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command.unwrap_or_else(|| Commands::Extract(Default::default())) {
        Commands::Extract(args) => extract_cmd::run(&args),
        Commands::Flatten { ref input, ref output } => flatten_cmd::run(input, output),
        Commands::Grid {
            ref file,
            page,
            bbox,
            raw,
            unicode_norm,
        } => grid_cmd::run(file, page, bbox, raw, unicode_norm.into()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `rigreport=info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rigreport=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
