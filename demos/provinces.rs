//! Streams records from a stanza file and reports on them.
//!
//! Bad records are reported and skipped instead of aborting the run.
//!
//! Run with: cargo run --example provinces -- path/to/file.txt
//! Without a path, a small built-in table is read.

use serde_stanza::{Reader, Writer, WriterOptions};
use std::error::Error;
use std::fs::File;
use std::io::{self, Read};

const BUILTIN: &str = "\
# Some Argentine provinces
ISO3166-2: AR-C
Name:      Ciudad Autónoma de Buenos Aires
Category:  City
%%
ISO3166-2: AR-B
Name:      Buenos Aires
Name:      Provincia de Buenos Aires
Category:  Province
%%
ISO3166-2: AR-T
Name:      Tucumán
Category:  Province
Anthem:
\tAl Gran Pueblo Argentino
\tsu ejemplo de virtud.
%%
";

fn main() -> Result<(), Box<dyn Error>> {
    let source: Box<dyn Read> = match std::env::args().nth(1) {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(BUILTIN.as_bytes()),
    };

    let mut reader = Reader::new(source);
    let mut records = Vec::new();
    loop {
        match reader.decode_next() {
            Ok(Some(record)) => records.push(record),
            Ok(None) => break,
            Err(e) => {
                eprintln!("skipping bad record: {}", e);
                if !reader.skip_record()? {
                    break;
                }
            }
        }
    }

    println!("Read {} records", records.len());
    println!("Fields seen: {}\n", reader.field_registry().join(", "));

    // Echo the records back with the fields in the order they were first seen
    let options = WriterOptions::new().with_fields(reader.field_registry().iter().cloned());
    let mut writer = Writer::with_options(io::stdout().lock(), options)?;
    writer.write_all(&records)?;
    writer.flush()?;

    Ok(())
}
