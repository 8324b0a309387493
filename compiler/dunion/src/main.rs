//! Main module.

mod args;

use std::{panic, process::exit};

use args::{DunionArgs, Mode};
use clap::Parser;
use dunion::{
    driver::{Driver, Output},
    settings::CompilerSettings,
};
use dunion_reporting::report::Report;
use dunion_utils::{crash::crash_handler, logging::CompilerLogger};

pub static CONSOLE_LOGGER: CompilerLogger = CompilerLogger::new();

fn emit(output: &Output) {
    print!("{}", output.text);

    for report in &output.reports {
        eprintln!("{report}");
    }
}

fn report_and_exit(report: Report) -> ! {
    eprintln!("{report}");
    exit(1)
}

fn main() {
    panic::set_hook(Box::new(crash_handler));

    let args = DunionArgs::parse();

    if let Err(err) = CompilerLogger::install(&CONSOLE_LOGGER, args.debug) {
        let mut report = Report::new();
        report.title(format!("couldn't set up logging: {err}"));
        report_and_exit(report);
    }

    let settings = match CompilerSettings::try_from(&args) {
        Ok(settings) => settings,
        Err(report) => report_and_exit(report),
    };

    let driver = Driver::new(settings);

    let output = match &args.mode {
        Mode::Layout { filename, union } => driver.layout(filename, union.as_deref()),
        Mode::Check { filename, union, arms } => driver.check(filename, union, arms),
        Mode::Construct { filename, union, variant, values, compare_with } => {
            driver.construct(filename, union, variant, values, compare_with.as_deref())
        }
    };

    emit(&output);

    if output.has_errors() {
        exit(1);
    }
}
