//! A binary to check that one or more Markov background model files are
//! well formed.
//!
//! ```shell
//! cargo run --release --bin=bg-check --features=binaries -- upstream.bg
//! ```
//!
//! For each file, the summary of everything wrong with it is printed. The
//! process exits with a non-zero status if any file has an error. Files ending
//! in `.gz` are decompressed before they are checked.

use std::fs::File;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use bgfile::Alphabet;
use bgfile::Reader;
use bgfile::alphabet::AlphabetSet;
use bgfile::diagnostics::Diagnostics;
use bgfile::diagnostics::Options;
use bgfile::parser::Status;
use bgfile::reader::DEFAULT_CHUNK_SIZE;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use flate2::read::GzDecoder;
use tracing::debug;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// The background files to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// The size in bytes above which a file is reported as large.
    #[arg(long, default_value_t = bgfile::diagnostics::DEFAULT_FILE_MAX)]
    file_max: u64,

    /// An acceptable alphabet (`DNA` or `PROTEIN`). May be given more than
    /// once. By default, every alphabet is acceptable.
    #[arg(short, long = "alphabet")]
    alphabets: Vec<Alphabet>,

    /// The number of bytes to read at a time.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Whether or not to print the background model of each file that has no
    /// errors.
    #[arg(short, long, default_value_t = false)]
    print: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

impl Args {
    /// Gets the options for the diagnostics.
    fn options(&self) -> Options {
        let alphabets = if self.alphabets.is_empty() {
            AlphabetSet::all()
        } else {
            self.alphabets.iter().copied().collect()
        };

        Options::default()
            .with_file_max(Some(self.file_max))
            .with_alphabets(alphabets)
    }
}

/// Checks a single file and prints its summary.
///
/// Returns whether the file has any error.
fn check(path: &Path, args: &Args) -> Result<bool> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut diagnostics = Diagnostics::new(args.options());

    let (parser, status) = match name.strip_suffix(".gz") {
        Some(stem) => {
            let mut data = Vec::new();

            File::open(path)
                .map(GzDecoder::new)
                .and_then(|mut decoder| decoder.read_to_end(&mut data))
                .with_context(|| format!("decompressing {}", path.display()))?;

            debug!("decompressed {} to {} bytes", path.display(), data.len());

            let mut reader = Reader::from(data.as_slice())
                .with_file_name(stem)
                .with_chunk_size(args.chunk_size);
            let mut parser = reader.parser();
            let status = reader.process(&mut parser, &mut diagnostics)?;
            (parser, status)
        }
        None => {
            let mut reader = Reader::from_path(path)
                .with_context(|| format!("opening {}", path.display()))?
                .with_chunk_size(args.chunk_size);
            let mut parser = reader.parser();
            let status = reader.process(&mut parser, &mut diagnostics)?;
            (parser, status)
        }
    };

    if status != Status::Done {
        bail!("the check of {} did not finish", path.display());
    }

    if diagnostics.is_fatal() {
        info!("{} could not be read as text", path.display());
    }

    let summary = diagnostics.summary();
    debug!(
        "{}: {} with {} slots",
        path.display(),
        summary.alphabet(),
        parser.store().len()
    );

    if summary.messages().is_empty() {
        println!("{}: OK ({})", path.display(), summary.alphabet());
    } else {
        println!("{}:", path.display());
        print!("{summary}");
    }

    if args.print && !summary.is_error() {
        if let Some(background) = parser.background() {
            print!("{background}");
        }
    }

    Ok(summary.is_error())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    let mut failed = 0usize;

    for path in &args.files {
        if check(path, &args)? {
            failed += 1;
        }
    }

    if failed > 0 {
        info!("{failed} of {} file(s) had errors", args.files.len());
        std::process::exit(1);
    }

    Ok(())
}
