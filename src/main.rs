//! buildprog - Build and program the nRF5340 Audio project on a bench of DKs
//!
//! # Architecture
//!
//! The CLI only parses arguments and wires collaborators together:
//! - **buildprog-core** validates the options, merges the device inventory
//!   with the attached probes, builds, resolves hex files and tracks each
//!   board's status
//! - **buildprog-host** provides the `west` build runner and the `nrfjprog`
//!   probe scanner / fleet programmer
//!
//! The run always ends with a status table. Boards that failed to program
//! are marked in the table; only configuration, inventory, probe, build and
//! hex lookup errors make the process exit non-zero.

mod cli;

use buildprog_core::fleet::discover_devices;
use buildprog_core::inventory::{self, INVENTORY_ENV};
use buildprog_core::{report, DeviceRecord, Orchestrator, RunOptions, Workspace};
use buildprog_host::{Nrfjprog, ShellBuilder};
use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use std::env;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log level for the `-v` count; `RUST_LOG` still takes precedence
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(cli: &Cli) -> buildprog_core::Result<()> {
    let user = current_user();
    let options = RunOptions::resolve(cli.raw_options(), user.as_deref())?;

    let workspace = match &cli.nrf_dir {
        Some(nrf_dir) => Workspace::new(&cli.app_dir, nrf_dir),
        None => Workspace::from_app_dir(&cli.app_dir),
    };

    let inventory_path = cli
        .inventory
        .clone()
        .unwrap_or_else(|| workspace.default_inventory());
    log::debug!(
        "Using inventory {} (override with {})",
        inventory_path.display(),
        INVENTORY_ENV
    );
    let entries = inventory::load_file(&inventory_path)?;

    let mut nrfjprog = Nrfjprog::new().with_progress(true);
    let mut devices = discover_devices(&mut nrfjprog, &entries, &options)?;
    println!("{}", report::render(&devices));

    let mut builder = ShellBuilder;
    let summary = Orchestrator::new(&options, &workspace, &mut builder, &mut nrfjprog)
        .run(&mut devices)?;
    log::debug!("Run summary: {:?}", summary);

    finish(&devices);
    Ok(())
}

/// Print the final report
fn finish(devices: &[DeviceRecord]) {
    println!("buildprog finished. Report:");
    println!("{}", report::render(devices));

    let failed = devices
        .iter()
        .filter(|d| {
            [d.only_reboot, d.core_app, d.core_net].contains(&buildprog_core::SelectFlags::Fail)
        })
        .count();
    if failed > 0 {
        log::warn!("{} device(s) failed", failed);
    }
}

/// Login name of the invoking user
fn current_user() -> Option<String> {
    ["LOGNAME", "USER", "LNAME", "USERNAME"]
        .iter()
        .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), LevelFilter::Info);
        assert_eq!(log_level(1), LevelFilter::Debug);
        assert_eq!(log_level(2), LevelFilter::Trace);
        assert_eq!(log_level(5), LevelFilter::Trace);
    }
}
