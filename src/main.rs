//! # smsslicer CLI
//!
//! Command-line interface for the smsslicer library.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use smsslicer::cli::{Args, Command, FormatArg, resolve_format};
use smsslicer::config::StreamingConfig;
use smsslicer::core::filter::parse_date;
use smsslicer::core::{Aggregator, ConversationStats, ExportRequest, Exporter};
use smsslicer::files::{default_download_dir, find_sms_backups, reveal_in_file_manager, validate_backup_path};
use smsslicer::progress::{no_progress, stderr_progress};
use smsslicer::{Result, SmsSlicerError};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only results.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Stats {
            file,
            top,
            json,
            batch_size,
        } => stats(&file, top, json, batch_size),
        Command::Export {
            file,
            address,
            from,
            to,
            format,
            output,
        } => export(&file, address, from.as_deref(), to.as_deref(), format, output),
        Command::Find { dir } => {
            find(&dir.unwrap_or_else(default_download_dir));
            Ok(())
        }
        Command::Reveal { path } => reveal_in_file_manager(&path),
    }
}

fn stats(file: &Path, top: usize, json: bool, batch_size: Option<usize>) -> Result<()> {
    let file = validate_backup_path(file)?;

    let mut config = StreamingConfig::new();
    if let Some(size) = batch_size {
        config = config.with_batch_size(size);
    }
    let table = Aggregator::with_config(config).aggregate(&file, stderr_progress())?;

    if json {
        let sorted: BTreeMap<_, _> = table.iter().collect();
        println!("{}", serde_json::to_string_pretty(&sorted)?);
        return Ok(());
    }

    println!("📦 smsslicer v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Backup:         {}", file.display());
    println!("💬 Messages:       {}", table.total_messages());
    println!("👥 Conversations:  {}", table.len());
    println!();

    if table.is_empty() {
        return Ok(());
    }

    println!(
        "{:<24} {:<18} {:>7} {:>7} {:>8}  {}",
        "Contact", "Address", "Total", "Sent", "Received", "Span"
    );
    for (address, stats) in table.top_by_count(top) {
        println!(
            "{:<24} {:<18} {:>7} {:>7} {:>8}  {}",
            stats.display_name(),
            address,
            stats.count,
            stats.sent,
            stats.received,
            span(stats)
        );
    }

    Ok(())
}

fn span(stats: &ConversationStats) -> String {
    match stats.date_span() {
        Some((first, last)) => format!("{first} .. {last}"),
        None => String::from("-"),
    }
}

fn export(
    file: &Path,
    address: String,
    from: Option<&str>,
    to: Option<&str>,
    format: Option<FormatArg>,
    output: Option<PathBuf>,
) -> Result<()> {
    let file = validate_backup_path(file)?;
    let from = from.map(parse_date).transpose()?;
    let to = to.map(parse_date).transpose()?;

    let (start, end) = match (from, to) {
        (Some(start), Some(end)) => (start, end),
        (from, to) => {
            // Fill the open ends from the conversation's own span
            let table = Aggregator::new().aggregate(&file, no_progress())?;
            let (first, last) = table
                .get(&address)
                .and_then(ConversationStats::date_span)
                .ok_or_else(|| SmsSlicerError::UnknownAddress(address.clone()))?;
            (from.unwrap_or(first), to.unwrap_or(last))
        }
    };

    let format = resolve_format(format, output.as_deref());
    let mut request = ExportRequest::new(address, start, end).with_format(format);
    if let Some(output) = output {
        request = request.with_output(output);
    }

    let written = Exporter::new().export(&file, &request)?;
    println!("✅ Exported {} ({start} .. {end}) to {}", request.address, written.display());

    Ok(())
}

fn find(dir: &Path) {
    let backups = find_sms_backups(Some(dir));
    if backups.is_empty() {
        println!("No SMS backups found in {}", dir.display());
        return;
    }

    for path in backups {
        println!("{}", path.display());
    }
}
