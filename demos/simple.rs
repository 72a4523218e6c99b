//! Basic stanza serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_stanza::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Country {
    code: String,
    name: String,
    capital: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let countries = vec![
        Country {
            code: "AR".to_string(),
            name: "Argentina".to_string(),
            capital: "Buenos Aires".to_string(),
        },
        Country {
            code: "UY".to_string(),
            name: "Uruguay".to_string(),
            capital: "Montevideo".to_string(),
        },
    ];

    // Serialize to stanza text
    let text = to_string(&countries)?;
    println!("Stanza output:\n{}", text);

    // Deserialize back to struct
    let countries_back: Vec<Country> = from_str(&text)?;
    assert_eq!(countries, countries_back);
    println!("✓ Round-trip successful");

    Ok(())
}
