//! Tests for the CLI module

use super::*;
use crate::error::Error;
use clap::Parser;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn test_parse_gather_defaults() {
    let cli = Cli::try_parse_from(["shoebox-picturebook", "gather"]).unwrap();

    assert_eq!(cli.source_uri, "shoebox://");
    assert_eq!(cli.caption_uri(), "shoebox://");
    assert!(!cli.verbose);
    assert!(matches!(cli.command, Commands::Gather { limit: None }));
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "shoebox-picturebook",
        "captions",
        "--limit",
        "5",
        "--caption-uri",
        "shoebox://?token=abc",
        "-C",
        "shoebox.yaml",
        "-v",
    ])
    .unwrap();

    assert_eq!(cli.caption_uri(), "shoebox://?token=abc");
    assert_eq!(cli.config, Some(PathBuf::from("shoebox.yaml")));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Captions { limit: Some(5) }));
}

#[test]
fn test_parse_fetch_requires_output() {
    assert!(Cli::try_parse_from(["shoebox-picturebook", "fetch", "https://x/y.jpg"]).is_err());

    let cli = Cli::try_parse_from([
        "shoebox-picturebook",
        "fetch",
        "https://x/y.jpg",
        "--output",
        "/tmp/y.jpg",
    ])
    .unwrap();
    match cli.command {
        Commands::Fetch { key, output } => {
            assert_eq!(key, "https://x/y.jpg");
            assert_eq!(output, PathBuf::from("/tmp/y.jpg"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[tokio::test]
async fn test_run_unknown_source_provider() {
    let cli = Cli::try_parse_from([
        "shoebox-picturebook",
        "gather",
        "--source-uri",
        "s3://bucket",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(err.to_string().contains("Failed to create bucket for 's3://bucket'"));
}

#[tokio::test]
async fn test_run_caption_unsupported_key() {
    let cli = Cli::try_parse_from([
        "shoebox-picturebook",
        "caption",
        "https://static.sfomuseum.org/media/abc.jpg",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedKey { .. }));
}

#[tokio::test]
async fn test_run_attributes_untrusted_key() {
    let cli = Cli::try_parse_from([
        "shoebox-picturebook",
        "attributes",
        "ftp://evil.example/x.jpg",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
}

#[tokio::test]
async fn test_run_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shoebox.yaml");
    std::fs::write(&path, "media:\n  trusted_prefix: https://static.example.org/media\n").unwrap();

    let cli = Cli::try_parse_from([
        "shoebox-picturebook",
        "-C",
        path.to_str().unwrap(),
        "attributes",
        "https://static.sfomuseum.org/media/1_a_k.jpg",
    ])
    .unwrap();

    // Default prefix no longer trusted
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
}
