use std::fs;
use std::path::PathBuf;

use balloon_core::{compile, BalloonDocument};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "balloon", version, about = "Balloon - comic bubble document to SVG compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a bubble document to SVG
    Compile {
        /// Input JSON file (document with meta + bubbles)
        input: PathBuf,

        /// Output SVG file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render text at its stored size instead of shrinking it to fit
        #[arg(long)]
        no_fit: bool,
    },
    /// Print version info
    Version,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            no_fit,
        } => {
            let json = match fs::read_to_string(&input) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error reading {}: {}", input.display(), e);
                    std::process::exit(1);
                }
            };

            let mut doc: BalloonDocument = match serde_json::from_str(&json) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Invalid document: {}", e);
                    std::process::exit(1);
                }
            };
            if no_fit {
                doc.meta.auto_fit = false;
            }

            let result = match compile(&doc) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Compile error: {}", e);
                    std::process::exit(1);
                }
            };

            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }

            match output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, &result.svg) {
                        eprintln!("Error writing {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                    eprintln!(
                        "Wrote {} ({}x{})",
                        path.display(),
                        result.width,
                        result.height
                    );
                }
                None => {
                    println!("{}", result.svg);
                }
            }
        }
        Commands::Version => {
            println!("balloon {}", env!("CARGO_PKG_VERSION"));
        }
    }
}
