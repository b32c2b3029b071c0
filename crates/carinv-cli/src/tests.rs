use std::path::PathBuf;

use super::*;

#[test]
fn parses_list_command() {
    let cli = Cli::try_parse_from(["carinv", "list"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::List));
}

#[test]
fn parses_crawl_with_config() {
    let cli = Cli::try_parse_from(["carinv", "crawl", "--config", "dealers.yaml", "-o", "out.json"])
        .expect("expected valid cli args");

    let Commands::Crawl(args) = cli.command else {
        panic!("expected crawl");
    };
    assert_eq!(args.config, Some(PathBuf::from("dealers.yaml")));
    assert_eq!(args.output, Some(PathBuf::from("out.json")));
    assert!(args.platform.is_none());
}

#[test]
fn parses_single_dealer_crawl() {
    let cli = Cli::try_parse_from([
        "carinv",
        "crawl",
        "dealeron",
        "--source",
        "dump.json",
        "--url",
        "https://lot.example",
        "--name",
        "Lot A",
    ])
    .expect("expected valid cli args");

    let Commands::Crawl(args) = cli.command else {
        panic!("expected crawl");
    };
    assert_eq!(args.platform, Some(Platform::DealerOn));
    assert_eq!(args.source, Some(PathBuf::from("dump.json")));
    assert_eq!(args.url.as_deref(), Some("https://lot.example"));
    assert_eq!(args.name.as_deref(), Some("Lot A"));
}

#[test]
fn crawl_without_mode_uses_defaults() {
    let cli = Cli::try_parse_from(["carinv", "crawl"]).expect("expected valid cli args");
    let Commands::Crawl(args) = cli.command else {
        panic!("expected crawl");
    };
    assert!(args.config.is_none());
    assert!(args.platform.is_none());
}

#[test]
fn crawl_rejects_mixed_modes() {
    let result = Cli::try_parse_from([
        "carinv",
        "crawl",
        "dealeron",
        "--source",
        "dump.json",
        "--config",
        "dealers.yaml",
    ]);
    assert!(result.is_err());
}

#[test]
fn crawl_platform_requires_source() {
    assert!(Cli::try_parse_from(["carinv", "crawl", "dealeron"]).is_err());
    assert!(Cli::try_parse_from(["carinv", "crawl", "--source", "dump.json"]).is_err());
}

#[test]
fn crawl_rejects_unknown_platform() {
    assert!(Cli::try_parse_from(["carinv", "crawl", "cdk", "--source", "dump.json"]).is_err());
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["carinv"]).is_err());
}
