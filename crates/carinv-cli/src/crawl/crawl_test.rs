use std::fs;

use carinv_core::{Drivetrain, Environment};

use super::*;

fn app_config(dealers_path: PathBuf) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        dealers_path,
        output_path: PathBuf::from("env-inventory.json"),
        max_concurrent_tasks: 2,
    }
}

fn single_dealer_args() -> CrawlArgs {
    CrawlArgs {
        platform: Some(Platform::DealerOn),
        source: Some(PathBuf::from("dumps/lot.json")),
        url: None,
        name: Some("Lot A".to_string()),
        config: None,
        output: None,
    }
}

fn file_args(config: Option<PathBuf>, output: Option<PathBuf>) -> CrawlArgs {
    CrawlArgs {
        platform: None,
        source: None,
        url: None,
        name: None,
        config,
        output,
    }
}

const DEALERS_YAML: &str = r#"
settings:
  output: reports/from-file.json
  drivetrain_aliases: {}
dealers:
  - name: Lot A
    platform: dealercom
    url: https://a.example/new-inventory/index.htm
    source: a.json
    accessory_names: ["Window Film"]
  - platform: dealeron
    url: https://b.example/searchnew.aspx
    source: b.json
"#;

#[test]
fn single_dealer_plan_uses_dump_path_as_url() {
    let plan = build_plan(&app_config(PathBuf::from("unused.yaml")), single_dealer_args()).unwrap();

    assert_eq!(plan.dealers.len(), 1);
    assert_eq!(plan.dealers[0].url, "dumps/lot.json");
    assert_eq!(plan.dealers[0].label(), "Lot A");
    assert_eq!(plan.output, PathBuf::from("env-inventory.json"));
    assert_eq!(plan.aliases, DrivetrainAliases::default());
}

#[test]
fn cli_output_overrides_environment() {
    let mut args = single_dealer_args();
    args.output = Some(PathBuf::from("cli.json"));
    let plan = build_plan(&app_config(PathBuf::from("unused.yaml")), args).unwrap();
    assert_eq!(plan.output, PathBuf::from("cli.json"));
}

#[test]
fn dealers_file_plan_reads_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dealers.yaml");
    fs::write(&path, DEALERS_YAML).unwrap();

    let plan = build_plan(&app_config(path), file_args(None, None)).unwrap();

    assert_eq!(plan.dealers.len(), 2);
    assert_eq!(plan.dealers[0].source, dir.path().join("a.json"));
    assert_eq!(plan.output, PathBuf::from("reports/from-file.json"));
    assert_eq!(plan.aliases, DrivetrainAliases::none());
}

#[test]
fn cli_output_overrides_dealers_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dealers.yaml");
    fs::write(&path, DEALERS_YAML).unwrap();

    let plan = build_plan(
        &app_config(PathBuf::from("unused.yaml")),
        file_args(Some(path), Some(PathBuf::from("cli.json"))),
    )
    .unwrap();

    assert_eq!(plan.output, PathBuf::from("cli.json"));
}

#[test]
fn missing_dealers_file_is_an_error() {
    let err = build_plan(
        &app_config(PathBuf::from("/nonexistent/dealers.yaml")),
        file_args(None, None),
    )
    .unwrap_err();
    assert!(err.to_string().contains("failed to load dealers file"));
}

#[tokio::test]
async fn run_crawl_writes_report_for_dealers_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"[
            {"vin": "A2", "drivetrain": "4WD", "msrp": "$45,000", "total_price": "$44,200",
             "packages": [
                 {"name": "Weather.", "price": "$375"},
                 {"name": "Window Film", "price": "$300"}
             ]},
            {"vin": "A1", "trim": "LE FWD"}
        ]"#,
    )
    .unwrap();
    fs::write(dir.path().join("b.json"), "[]").unwrap();
    let dealers = dir.path().join("dealers.yaml");
    fs::write(&dealers, DEALERS_YAML).unwrap();
    let output = dir.path().join("out/inventory.json");

    run_crawl(
        &app_config(dealers),
        file_args(None, Some(output.clone())),
    )
    .await
    .unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let records = written.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["vin"], "A1");
    assert_eq!(records[0]["drivetrain"], Drivetrain::Fwd.as_str());

    let a2 = &records[1];
    assert_eq!(a2["drivetrain"], "4WD");
    assert_eq!(a2["dealer_name"], "Lot A");
    assert_eq!(a2["total_packages_price"], 375);
    assert_eq!(a2["dealer_accessories_price"], 300);
    assert_eq!(a2["base_price"], 44_625);
    assert_eq!(a2["adjustments"], -1_100);
}

#[tokio::test]
async fn run_crawl_writes_nothing_for_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("lot.json");
    fs::write(&dump, "[]").unwrap();
    let output = dir.path().join("inventory.json");

    let mut args = single_dealer_args();
    args.source = Some(dump);
    args.output = Some(output.clone());
    run_crawl(&app_config(PathBuf::from("unused.yaml")), args)
        .await
        .unwrap();

    assert!(!output.exists());
}
