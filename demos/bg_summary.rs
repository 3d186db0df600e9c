//! Checks a background file and prints the summary of what was found, along
//! with the progress of the check.
//!
//! ```
//! cargo run --release --example bg_summary <BACKGROUND> [CHUNK_SIZE]
//! ```

use std::env;

use bgfile::Alphabet;
use bgfile::Reader;
use bgfile::diagnostics::Diagnostics;
use bgfile::fault::Fault;
use bgfile::handler::Handler;

/// Prints the progress of a check while passing every event on.
struct Progress<'a>(&'a mut Diagnostics);

impl Handler for Progress<'_> {
    fn begin(&mut self, size: u64) {
        println!("checking {size} bytes");
        self.0.begin(size);
    }

    fn progress(&mut self, fraction: f64, alphabet: Alphabet) {
        println!("{:>5.1}% ({alphabet})", fraction * 100.0);
        self.0.progress(fraction, alphabet);
    }

    fn error(&mut self, fault: Fault) {
        self.0.error(fault);
    }

    fn end(&mut self, alphabet: Alphabet) {
        self.0.end(alphabet);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let src = env::args().nth(1).expect("missing src");
    let chunk_size = env::args()
        .nth(2)
        .map(|s| {
            s.parse::<usize>()
                .unwrap_or_else(|_| panic!("could not parse chunk size: {s}"))
        })
        .unwrap_or(bgfile::reader::DEFAULT_CHUNK_SIZE);

    let mut diagnostics = Diagnostics::default();

    Reader::from_path(&src)?
        .with_chunk_size(chunk_size)
        .parse(&mut Progress(&mut diagnostics))?;

    let summary = diagnostics.summary();

    if summary.messages().is_empty() {
        println!("{src}: no problems found ({}).", summary.alphabet());
    } else {
        print!("{summary}");
    }

    Ok(())
}
