//! Additional tests for the CLI and format types

#![cfg(feature = "cli")]

use clap::Parser;
use smsslicer::cli::{Args, Command, FormatArg};
use smsslicer::format::ExportFormat;
use std::path::PathBuf;
use std::str::FromStr;

#[test]
fn test_export_format_from_str_all_variants() {
    assert!(ExportFormat::from_str("txt").is_ok());
    assert!(ExportFormat::from_str("text").is_ok());
    assert!(ExportFormat::from_str("csv").is_ok());

    // Case variations
    assert!(ExportFormat::from_str("TXT").is_ok());
    assert!(ExportFormat::from_str("Text").is_ok());
    assert!(ExportFormat::from_str("CSV").is_ok());
}

#[test]
fn test_export_format_from_str_errors() {
    assert!(ExportFormat::from_str("").is_err());
    assert!(ExportFormat::from_str("json").is_err());
    assert!(ExportFormat::from_str("xml").is_err());

    let message = ExportFormat::from_str("pdf").unwrap_err().to_string();
    assert!(message.contains("txt, text, csv"), "{message}");
}

#[test]
fn test_format_arg_conversion() {
    assert_eq!(ExportFormat::from(FormatArg::Txt), ExportFormat::Txt);
    assert_eq!(ExportFormat::from(FormatArg::Csv), ExportFormat::Csv);
    assert_eq!(ExportFormat::from(FormatArg::default()), ExportFormat::default());
}

#[test]
fn test_parse_find_and_reveal() {
    let args = Args::parse_from(["smsslicer", "find"]);
    assert!(matches!(args.command, Command::Find { dir: None }));

    let args = Args::parse_from(["smsslicer", "find", "/tmp/backups"]);
    match args.command {
        Command::Find { dir } => assert_eq!(dir, Some(PathBuf::from("/tmp/backups"))),
        other => panic!("unexpected command: {other:?}"),
    }

    let args = Args::parse_from(["smsslicer", "reveal", "out.txt"]);
    assert!(matches!(args.command, Command::Reveal { .. }));
}

#[test]
fn test_verbose_is_global() {
    let args = Args::parse_from(["smsslicer", "stats", "b.xml", "--verbose"]);
    assert!(args.verbose);

    let args = Args::parse_from(["smsslicer", "-v", "find"]);
    assert!(args.verbose);
}

#[test]
fn test_stats_batch_size() {
    let args = Args::parse_from(["smsslicer", "stats", "b.xml", "--batch-size", "500", "-n", "3"]);
    match args.command {
        Command::Stats { batch_size, top, .. } => {
            assert_eq!(batch_size, Some(500));
            assert_eq!(top, 3);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
