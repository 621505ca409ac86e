use std::env;
use std::process::exit;

use anyhow::{bail, Context, Result};
use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use torqtrack::config::{Config, DEFAULT_EXPORT_SECRET};
use torqtrack::export::{self, Access};
use torqtrack::options::OptionResolver;
use torqtrack::record::{Field, Record, Status};
use torqtrack::store::{self, RecordStore};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) dispatch ─────────────────────────────────────────────────
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
        exit(1);
    }
    let config = Config::from_env();

    match args[1].as_str() {
        "add" => cmd_add(&config, &args[2..]),
        "list" => cmd_list(&config, &args[2..]),
        "options" => cmd_options(&config, &args[2..]),
        "export" => cmd_export(&config, &args[2..]),
        "backups" => cmd_backups(&config),
        other => {
            eprintln!("unknown command: {}", other);
            usage(&args[0]);
            exit(1)
        }
    }
}

fn usage(program: &str) {
    eprintln!("Usage: {} <command> [args]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  add <LINE> <TEST_PACK> <BOLTS> <TYPE> <SUPERVISOR> <TORQUE> <STATUS> [REMARKS...]");
    eprintln!("        record one entry per bolt in the comma-separated BOLTS list");
    eprintln!("  list [N]                 show recorded entries, latest first");
    eprintln!("  options <FIELD> [LINE]   show the choice list for a field");
    eprintln!("  export <OUT_ZIP> <SECRET>  write a snapshot archive");
    eprintln!("  backups                  list backup snapshots");
    eprintln!();
    eprintln!("Configuration comes from TORQTRACK_* environment variables.");
}

/// One load, one append batch, one persist. Presence checks run before
/// anything is written, so a rejected submission leaves the file alone.
fn cmd_add(config: &Config, args: &[String]) -> Result<()> {
    if args.len() < 7 {
        eprintln!(
            "Usage: add <LINE> <TEST_PACK> <BOLTS> <TYPE> <SUPERVISOR> <TORQUE> <STATUS> [REMARKS...]"
        );
        exit(1);
    }
    let line = args[0].trim();
    let test_pack = args[1].trim();
    let bolts: Vec<&str> = args[2]
        .split(',')
        .map(str::trim)
        .filter(|bolt| !bolt.is_empty())
        .collect();
    let bolting_type = args[3].trim();
    let supervisor = args[4].trim();
    let torque = args[5].trim();
    let status = args[6].trim();
    let remarks = args[7..].join(" ");

    if line.is_empty() {
        eprintln!("warning: LINE NO is required, nothing saved");
        exit(1);
    }
    if bolts.is_empty() {
        eprintln!("warning: select at least one bolt number, nothing saved");
        exit(1);
    }
    if Status::from_str(status).is_none() {
        let recognized = Status::ALL
            .iter()
            .map(|s| format!("{:?}", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!(
            "warning: unrecognized status {:?} (recognized: {}), nothing saved",
            status, recognized
        );
        exit(1);
    }

    let mut store = RecordStore::load(&config.file, config.missing_file)?;
    warn_missing_fields(&store);

    let date = Local::now().format("%Y-%m-%d").to_string();
    let records: Vec<Record> = bolts
        .iter()
        .map(|bolt| {
            let mut record = Record::default();
            record.set(Field::LineNo, line);
            record.set(Field::TestPackNo, test_pack);
            record.set(Field::BoltNo, *bolt);
            record.set(Field::BoltingType, bolting_type);
            record.set(Field::Date, date.as_str());
            record.set(Field::Supervisor, supervisor);
            record.set(Field::TorqueValue, torque);
            record.set(Field::Status, status);
            record.set(Field::Remarks, remarks.as_str());
            record
        })
        .collect();

    let added = store.append(&records);
    store.persist_and_backup(config.backup, &config.backup_dir)?;
    info!(rows = added, path = %store.path().display(), "saved entries");

    println!("recently added:");
    for record in &records {
        print_record(record);
    }
    println!("{} record(s) saved to {}", added, store.path().display());
    Ok(())
}

fn cmd_list(config: &Config, args: &[String]) -> Result<()> {
    let limit = match args.first() {
        Some(n) => n
            .parse::<usize>()
            .with_context(|| format!("invalid row limit {:?}", n))?,
        None => usize::MAX,
    };
    let store = RecordStore::load(&config.file, config.missing_file)?;
    warn_missing_fields(&store);

    if store.is_empty() {
        println!("(no records in {})", store.path().display());
        return Ok(());
    }
    let header: Vec<&str> = Field::ALL.iter().map(|field| field.canonical()).collect();
    println!("{}", header.join(" | "));
    for record in store.rows_latest_first().iter().take(limit) {
        print_record(record);
    }
    Ok(())
}

fn cmd_options(config: &Config, args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Usage: options <FIELD> [LINE]");
        exit(1);
    }
    let Some(field) = Field::from_cli_name(&args[0]) else {
        let known: Vec<&str> = Field::ALL.iter().map(|field| field.cli_name()).collect();
        eprintln!("unknown field {:?}, expected one of: {}", args[0], known.join(", "));
        exit(1)
    };

    let store = RecordStore::load(&config.file, config.missing_file)?;
    let resolver = OptionResolver::new(config.bolt_domain);
    let parent = args.get(1).map(|line| (Field::LineNo, line.as_str()));
    let options = resolver.options_for(&store, field, parent);

    if options.is_empty() {
        println!("(no options for {})", field.cli_name());
        return Ok(());
    }
    for option in options {
        println!("{}", option);
    }
    Ok(())
}

fn cmd_export(config: &Config, args: &[String]) -> Result<()> {
    if args.len() < 2 {
        eprintln!("Usage: export <OUT_ZIP> <SECRET>");
        exit(1);
    }
    let out_path = &args[0];
    let candidate = &args[1];

    if candidate.is_empty() {
        bail!("export secret required");
    }
    if export::authorize(candidate, &config.export_secret) == Access::Denied {
        bail!("export secret rejected");
    }
    if config.export_secret == DEFAULT_EXPORT_SECRET {
        warn!("export gate is still using the built-in default secret");
    }

    let store = RecordStore::load(&config.file, config.missing_file)?;
    let summary = export::export_snapshot(&store, out_path, config.archive_passphrase.as_deref())?;
    println!(
        "exported {} row(s) to {}{}",
        summary.rows,
        summary.path.display(),
        if summary.locked { " (passphrase locked)" } else { "" }
    );
    Ok(())
}

fn cmd_backups(config: &Config) -> Result<()> {
    let stem = config
        .file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("tracking");
    let snapshots = store::list_snapshots(&config.backup_dir, stem)?;
    if snapshots.is_empty() {
        println!("(no backup snapshots under {})", config.backup_dir.display());
        return Ok(());
    }
    for path in snapshots {
        println!("{}", path.display());
    }
    Ok(())
}

fn warn_missing_fields(store: &RecordStore) {
    let missing = store.missing_fields();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|field| field.canonical()).collect();
        warn!(columns = ?names, "expected columns missing from the file");
    }
}

fn print_record(record: &Record) {
    println!(
        "  {} | {} | {} | {} | {} | {} | {} | {} | {}",
        record.line_no,
        record.test_pack_no,
        record.bolt_no,
        record.bolting_type,
        record.date,
        record.supervisor,
        record.torque_value,
        record.status,
        record.remarks
    );
}
