use district_registrations::chart::RenderOutcome;
use district_registrations::config::Config;
use district_registrations::error::PipelineError;
use district_registrations::output::EMPTY_NOTICE;
use district_registrations::pipeline::{RunOptions, run};
use district_registrations::rank::{RankedEntry, top_n};
use district_registrations::source::aggregate_files;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COMPANIES_HEADER: &str = "CORPORATE_IDENTIFICATION_NUMBER,CompanyRegistrationdate_date,Registered_Office_Address\n";

fn config_in(dir: &TempDir, zipcodes: &str, companies: &str) -> Config {
    let zip_path = dir.path().join("zipcode.csv");
    let companies_path = dir.path().join("company_master.csv");
    fs::write(&zip_path, zipcodes).unwrap();
    fs::write(&companies_path, format!("{COMPANIES_HEADER}{companies}")).unwrap();

    Config {
        companies_file_path: companies_path,
        zipcode_file_path: zip_path,
        output_plot_path: dir.path().join("plots/registrations.png"),
        show_plot: false,
        ..Config::default()
    }
}

#[test]
fn test_end_to_end_single_district() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(
        &dir,
        "ZipCode,District\n100001,North\n",
        "U1,2015-01-01,\"Flat 2, Ring Road, 100001 North City\"\n",
    );

    let (counts, stats) = aggregate_files(&config).unwrap();

    assert_eq!(counts.iter().collect::<Vec<_>>(), vec![("North", 1)]);
    assert_eq!(stats.rows_matched, 1);
}

#[test]
fn test_first_code_in_address_wins() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(
        &dir,
        "ZipCode,District\n100001,North\n200002,South\n",
        "U1,2015-05-05,\"Office 200002, Branch 100001\"\n",
    );

    let (counts, _) = aggregate_files(&config).unwrap();

    assert_eq!(counts.get("South"), 1);
    assert_eq!(counts.get("North"), 0);
}

#[test]
fn test_other_years_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(
        &dir,
        "ZipCode,District\n100001,North\n",
        "U1,2014-12-31,100001\nU2,2016-01-01,100001\nU3,,100001\n",
    );

    let (counts, stats) = aggregate_files(&config).unwrap();

    assert!(counts.is_empty());
    assert_eq!(stats.rows_read, 3);
    assert_eq!(stats.rows_in_year, 0);
}

#[test]
fn test_aggregation_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(
        &dir,
        "ZipCode,District\n100001,North\n200002,South\n",
        "U1,2015-01-01,100001\nU2,2015-01-02,200002\nU3,2015-01-03,100001\n",
    );

    let (first, _) = aggregate_files(&config).unwrap();
    let (second, _) = aggregate_files(&config).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_ranking_breaks_ties_by_first_seen() {
    let dir = tempfile::tempdir().unwrap();
    let zipcodes = "ZipCode,District\n100001,A\n200002,B\n300003,C\n400004,D\n";
    let mut companies = String::new();
    // B is seen before C; both end with 7.
    for (code, n) in [("200002", 7), ("300003", 7), ("100001", 10), ("400004", 3)] {
        for i in 0..n {
            companies.push_str(&format!("U{code}{i},2015-01-01,Addr {code}\n"));
        }
    }
    let config = config_in(&dir, zipcodes, &companies);

    let (counts, _) = aggregate_files(&config).unwrap();

    assert_eq!(
        top_n(&counts, 2),
        vec![RankedEntry::new("A", 10), RankedEntry::new("B", 7)]
    );
}

#[test]
fn test_no_valid_mappings_skips_chart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(
        &dir,
        "ZipCode,District\n,North\n100001,\n",
        "U1,2015-01-01,100001\n",
    );

    let mut out = Vec::new();
    let summary = run(&config, RunOptions::default(), &mut out).unwrap();

    assert!(summary.counts.is_empty());
    assert_eq!(summary.outcome, RenderOutcome::Skipped);
    assert!(!config.output_plot_path.exists());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("District Registration Counts:"));
    assert!(text.ends_with(&format!("{EMPTY_NOTICE}\n")));
}

#[test]
fn test_json_report_on_empty_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "ZipCode,District\n", "U1,2015-01-01,100001\n");

    let mut out = Vec::new();
    run(&config, RunOptions { json: true }, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let json_start = text.find('{').unwrap();
    let value: serde_json::Value = serde_json::from_str(&text[json_start..]).unwrap();
    assert_eq!(value["total_registrations"], 0);
    assert_eq!(value["stats"]["rows_read"], 1);
}

#[test]
fn test_missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        companies_file_path: dir.path().join("absent_companies.csv"),
        zipcode_file_path: dir.path().join("absent_zip.csv"),
        show_plot: false,
        ..Config::default()
    };

    let err = run(&config, RunOptions::default(), &mut Vec::new()).unwrap_err();

    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::MissingInputFile { path, .. }) => {
            assert_eq!(path.as_path(), Path::new(&config.zipcode_file_path));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_config_rejected_before_reading() {
    let config = Config {
        top_n: 0,
        ..Config::default()
    };

    let err = run(&config, RunOptions::default(), &mut Vec::new()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidConfig(_))
    ));
}

#[test]
fn test_full_run_writes_chart_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(
        &dir,
        "ZipCode,District\n100001,North\n200002,South\n",
        "U1,2015-01-01,100001\nU2,2015-01-02,200002\nU3,2015-01-03,100001\n",
    );
    let csv_path = dir.path().join("top.csv");
    config.csv_output_path = Some(csv_path.clone());

    let summary = run(&config, RunOptions::default(), &mut Vec::new()).unwrap();

    assert!(matches!(summary.outcome, RenderOutcome::Rendered { .. }));
    assert!(config.output_plot_path.exists());
    assert_eq!(
        fs::read_to_string(csv_path).unwrap(),
        "district,count\nNorth,2\nSouth,1\n"
    );
}
