//! Prints the probabilities of a background file as a table.
//!
//! ```
//! cargo run --release --example bg_view <BACKGROUND> [CHAIN_LENGTH]...
//! ```
//!
//! Files ending in `.gz` are decompressed first. When chain lengths are given,
//! only chains of those lengths are shown.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::io::Read as _;

use flate2::read::GzDecoder;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;

use bgfile::diagnostics::Diagnostics;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let src = env::args().nth(1).expect("missing src");

    let lengths: Vec<usize> = env::args()
        .skip(2)
        .map(|s| {
            s.parse::<usize>()
                .unwrap_or_else(|_| panic!("could not parse chain length: {s}"))
        })
        .collect();

    let mut data = Vec::new();

    if src.ends_with(".gz") {
        File::open(&src)
            .map(GzDecoder::new)
            .map(BufReader::new)?
            .read_to_end(&mut data)?;
    } else {
        File::open(&src)?.read_to_end(&mut data)?;
    }

    let mut diagnostics = Diagnostics::default();
    let parser = bgfile::Reader::from(data.as_slice()).parse(&mut diagnostics)?;

    let background = match parser.background() {
        Some(background) => background,
        None => {
            eprint!("{}", diagnostics.summary());
            return Err(format!("{src} is not a valid background file").into());
        }
    };

    let mut builder = Builder::default();
    builder.push_record(["Length", "Chain", "Probability"]);

    for (chain, probability) in background.iter() {
        let length = chain.chars().count();

        if !lengths.is_empty() && !lengths.contains(&length) {
            continue;
        }

        builder.push_record([
            length.to_string(),
            chain,
            format!("{probability:.3e}"),
        ]);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!(
        "{} background model of order {}",
        background.alphabet(),
        background.order()
    );
    println!("{}", table);

    Ok(())
}
