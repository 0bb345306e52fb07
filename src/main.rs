//! CLI entry point for the district registrations report.
//!
//! Counts company registrations per district for one year and charts the
//! busiest districts. With no arguments it reads `data/company_master.csv`
//! and `data/zipcode.csv` and writes `plots/registrations_2015_by_district.png`.

use anyhow::Result;
use clap::Parser;
use district_registrations::config::Config;
use district_registrations::pipeline::{RunOptions, run};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "district_registrations")]
#[command(about = "Rank districts by company registrations for a year", long_about = None)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long, value_name = "FILE", env = "DISTRICT_REG_CONFIG")]
    config: Option<PathBuf>,

    /// Company registrations CSV
    #[arg(long, value_name = "FILE", env = "COMPANIES_FILE_PATH")]
    companies: Option<PathBuf>,

    /// Postal code to district mapping CSV
    #[arg(long, value_name = "FILE", env = "ZIPCODE_FILE_PATH")]
    zipcodes: Option<PathBuf>,

    /// Where to write the chart image
    #[arg(short, long, value_name = "FILE", env = "OUTPUT_PLOT_PATH")]
    output: Option<PathBuf>,

    /// Registration year, matched as a prefix of the date column
    #[arg(short, long, env = "TARGET_YEAR")]
    year: Option<String>,

    /// Number of districts to chart
    #[arg(short = 'n', long, env = "TOP_N")]
    top: Option<usize>,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// Also export the ranked districts to this CSV file
    #[arg(long, value_name = "FILE")]
    csv_out: Option<PathBuf>,

    /// Print a JSON report after the count table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Don't open the chart in an image viewer
    #[arg(long, default_value_t = false)]
    no_show: bool,
}

impl Cli {
    fn into_config(self) -> Result<(Config, RunOptions)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(companies) = self.companies {
            config.companies_file_path = companies;
        }
        if let Some(zipcodes) = self.zipcodes {
            config.zipcode_file_path = zipcodes;
        }
        if let Some(output) = self.output {
            config.output_plot_path = output;
        }
        if let Some(year) = self.year {
            config.target_year = year;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        if self.title.is_some() {
            config.chart_title = self.title;
        }
        if self.csv_out.is_some() {
            config.csv_output_path = self.csv_out;
        }
        if self.no_show {
            config.show_plot = false;
        }

        Ok((config, RunOptions { json: self.json }))
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/district_registrations.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("district_registrations.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let (config, options) = Cli::parse().into_config()?;
    info!(
        companies = %config.companies_file_path.display(),
        zipcodes = %config.zipcode_file_path.display(),
        year = %config.target_year,
        top_n = config.top_n,
        "Starting district registrations report"
    );

    let mut stdout = std::io::stdout();
    run(&config, options, &mut stdout)?;

    Ok(())
}
