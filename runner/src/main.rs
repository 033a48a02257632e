use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::*;

use rfstest_core::config::{self, HarnessConfig};
use rfstest_core::controller::RunConfig;
use rfstest_core::loader::AvrdudeLoader;
use rfstest_core::session::run_session;
use rfstest_core::tables::Suite;
use rfstest_core::transport::SerialTransport;
use rfstest_core::verifier::Registry;
use rfstest_runner::RunReport;

#[derive(Parser)]
struct Args {
    /// Serial device connected to the target, e.g. /dev/ttyUSB0
    device: String,

    /// Test suite to run
    #[arg(long, default_value_t = Suite::Pwm)]
    suite: Suite,

    /// Firmware image to flash; defaults to the suite's image name
    #[arg(long)]
    image: Option<PathBuf>,

    /// Baud rate used while programming
    #[arg(long, default_value_t = config::DEFAULT_BAUD_RATE)]
    programming_baud: u32,

    /// Baud rate of the report link
    #[arg(long, default_value_t = config::DEFAULT_BAUD_RATE)]
    comm_baud: u32,

    /// avrdude programmer id
    #[arg(long, default_value = config::DEFAULT_PROGRAMMER)]
    programmer: String,

    /// Target part number
    #[arg(long, default_value = config::DEFAULT_PART)]
    part: String,

    /// Run deadline in seconds; 0 disables the deadline
    #[arg(long, default_value_t = 60)]
    deadline: u64,

    /// Accept this many reports instead of the full suite
    #[arg(long)]
    expected_tests: Option<usize>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();

    let registry = Registry::new(args.suite.checks())?;
    let image = args
        .image
        .unwrap_or_else(|| PathBuf::from(args.suite.image_name()));

    let mut harness_config = HarnessConfig::new(args.device.clone());
    harness_config.programming_baud = args.programming_baud;
    harness_config.comm_baud = args.comm_baud;
    harness_config.programmer = args.programmer;
    harness_config.part = args.part;
    harness_config.run_deadline = match args.deadline {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let run_config = RunConfig {
        expected_total: args.expected_tests.unwrap_or_else(|| registry.len()),
        deadline: harness_config.run_deadline,
    };

    info!(
        "Suite {} on {}: expecting {} reports",
        args.suite, harness_config.device, run_config.expected_total
    );

    let loader = AvrdudeLoader::new(&harness_config);
    let outcome = run_session(
        &loader,
        &image,
        || {
            SerialTransport::open(
                &harness_config.device,
                harness_config.comm_baud,
                harness_config.read_timeout,
                harness_config.settle_time,
            )
        },
        &registry,
        &run_config,
    )?;

    if let Some(report_fn) = args.report {
        let report = RunReport::new(
            &args.suite.to_string(),
            &image.to_string_lossy(),
            run_config.expected_total,
            &outcome,
        );
        fs::write(&report_fn, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Cannot write report to {}", report_fn.display()))?;
        info!("Report written to {}", report_fn.display());
    }

    info!("Verdict: {}", outcome.verdict);
    std::process::exit(outcome.verdict.exit_code());
}
