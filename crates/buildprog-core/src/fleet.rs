//! Fleet orchestration
//!
//! A run goes through at most three phases:
//!
//! 1. reboot only (exclusive; nothing is built or programmed),
//! 2. build, one application-core build at a time,
//! 3. program every connected board with the images of phase 2.
//!
//! Fatal errors abort the remaining work of the current phase. Boards that
//! fail to reboot or program do not: their status is left at `Fail` and the
//! run completes normally.

use crate::artifact::resolve_hex_paths;
use crate::build::{plan_builds, run_build, Builder};
use crate::device::DeviceRecord;
use crate::error::{ProbeError, Result};
use crate::inventory::{merge, InventoryEntry};
use crate::options::{BootloaderMode, Core, RunOptions};
use crate::workspace::Workspace;

/// Lists the serial numbers of attached debug probes
pub trait ProbeScanner {
    /// Serial numbers of all attached probes
    fn list(&mut self) -> std::result::Result<Vec<u64>, ProbeError>;
}

/// Reboots or programs a set of boards
///
/// Implementations update the status fields of each device in place and
/// honor `recover_on_fail` per device. Failures are never returned.
pub trait FleetProgrammer {
    /// Service every device that has pending work
    fn run(
        &mut self,
        devices: &mut [DeviceRecord],
        bootloader: Option<BootloaderMode>,
        sequential: bool,
    );
}

/// What a completed run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSummary {
    /// Boards were only rebooted
    Rebooted,
    /// Build and/or program phases ran
    Completed {
        /// Number of application-core builds run
        builds: usize,
        /// Whether the program phase ran
        programmed: bool,
    },
}

/// Merge the inventory with the probes currently attached
pub fn discover_devices(
    scanner: &mut dyn ProbeScanner,
    inventory: &[InventoryEntry],
    options: &RunOptions,
) -> Result<Vec<DeviceRecord>> {
    let attached = scanner.list()?;
    if attached.is_empty() {
        log::warn!("No snrs connected");
    } else {
        log::debug!("Attached probes: {:?}", attached);
    }
    Ok(merge(inventory, &attached, options))
}

/// Drives a run over the device fleet
pub struct Orchestrator<'a> {
    options: &'a RunOptions,
    workspace: &'a Workspace,
    builder: &'a mut dyn Builder,
    programmer: &'a mut dyn FleetProgrammer,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator with its collaborators
    pub fn new(
        options: &'a RunOptions,
        workspace: &'a Workspace,
        builder: &'a mut dyn Builder,
        programmer: &'a mut dyn FleetProgrammer,
    ) -> Self {
        Self {
            options,
            workspace,
            builder,
            programmer,
        }
    }

    /// Run the phases selected by the options
    pub fn run(&mut self, devices: &mut [DeviceRecord]) -> Result<RunSummary> {
        let options = self.options;

        if options.only_reboot {
            self.programmer
                .run(devices, options.bootloader, options.sequential);
            return Ok(RunSummary::Rebooted);
        }

        let builds = self.build()?;

        let programmed = options.program;
        if programmed {
            for dev in devices.iter_mut().filter(|d| d.connected) {
                resolve_hex_paths(dev, options, self.workspace)?;
            }
            self.programmer
                .run(devices, options.bootloader, options.sequential);
        }

        Ok(RunSummary::Completed { builds, programmed })
    }

    fn build(&mut self) -> Result<usize> {
        let options = self.options;
        if options.build.is_none() {
            return Ok(0);
        }

        log::info!("Invoking build step");
        let plans = plan_builds(options);
        if options.has_core(Core::Net) {
            log::info!("Net core uses precompiled hex or child image");
        }
        for plan in &plans {
            run_build(plan, options, self.workspace, self.builder)?;
        }
        Ok(plans.len())
    }
}
