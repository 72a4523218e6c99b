//! Customizing reader and writer behavior.
//!
//! Run with: cargo run --example custom_options

use serde::Serialize;
use serde_stanza::{
    to_string, to_string_with_options, Indent, Reader, ReaderOptions, WriterOptions,
};
use std::error::Error;

#[derive(Debug, Serialize)]
struct Province {
    #[serde(rename = "iso3166-2")]
    code: String,
    name: String,
    capital: Option<String>,
    anthem: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let province = Province {
        code: "AR-V".to_string(),
        name: "Tierra del Fuego".to_string(),
        capital: None,
        anthem: Some("Canto a Tierra del Fuego\ncon su mar y su cielo".to_string()),
    };

    // Default format: sorted fields, empty fields dropped, tab indent
    println!("Default:");
    println!("{}", to_string(&province)?);

    // Explicit field order
    println!("Field order:");
    let ordered = WriterOptions::new().with_fields(["iso3166-2", "name", "capital", "anthem"]);
    println!("{}", to_string_with_options(&province, ordered.clone())?);

    // Keep empty fields as bare names, indent continuations with a space
    println!("Force empty, space indent:");
    let options = ordered.with_force_empty(true).with_indent(Indent::Space);
    let text = to_string_with_options(&province, options)?;
    println!("{}", text);

    // Bare names only survive a read when the reader keeps empty fields
    let options = ReaderOptions::new().with_keep_empty(true);
    let records = Reader::with_options(text.as_bytes(), options).into_records()?;
    println!("Read back with keep_empty: {:?}", records[0]);

    Ok(())
}
