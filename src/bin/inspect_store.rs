use std::{env, path::Path, process::exit};

use anyhow::Result;

use torqtrack::options::{BoltDomain, OptionResolver};
use torqtrack::record::Field;
use torqtrack::store::{MissingFilePolicy, RecordStore};

fn main() {
    // Expect exactly one CLI argument: path to a tracking CSV.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <TRACKING_CSV>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_store(Path::new(&args[1])) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

/// Load the store and print how its header resolved, plus per-field
/// distinct-value counts.
fn inspect_store(path: &Path) -> Result<()> {
    let store = RecordStore::load(path, MissingFilePolicy::Fail)?;

    println!("=== Tracking file: {} ===", store.path().display());
    println!("Rows: {}", store.len());
    println!();

    // 1) physical columns and the logical field each one satisfies
    println!("=== Columns ===");
    for (idx, column) in store.columns().iter().enumerate() {
        let owner = Field::for_header(column)
            .map(|field| field.cli_name())
            .unwrap_or("-");
        println!("- [{}] {:<24} field: {}", idx, column, owner);
    }
    let missing = store.missing_fields();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|field| field.canonical()).collect();
        println!("Missing fields: {}", names.join(", "));
    }
    println!();

    // 2) distinct recorded values per logical field
    println!("=== Distinct values ===");
    let resolver = OptionResolver::new(BoltDomain::Derived);
    for field in Field::ALL {
        let values = resolver.options_for(&store, field, None);
        println!("- {:<10} {}", field.cli_name(), values.len());
    }
    Ok(())
}
