//! nrfjprog-backed probe scanner and fleet programmer

use buildprog_core::device::{DeviceRecord, SelectFlags};
use buildprog_core::error::ProbeError;
use buildprog_core::options::{BootloaderMode, Core};
use buildprog_core::{FleetProgrammer, ProbeScanner};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::process::Command;
use std::thread;

const NRFJPROG: &str = "nrfjprog";

/// Spawns external tools
///
/// Shared between programming threads, one per board.
pub trait CommandRunner: Sync {
    /// Run to completion with inherited stdio and return the exit code
    fn status(&self, program: &str, args: &[String]) -> io::Result<i32>;

    /// Run to completion and return the exit code and captured stdout
    fn output(&self, program: &str, args: &[String]) -> io::Result<(i32, String)>;
}

/// Runs tools with [`std::process::Command`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn status(&self, program: &str, args: &[String]) -> io::Result<i32> {
        let status = Command::new(program).args(args).status()?;
        Ok(status.code().unwrap_or(-1))
    }

    fn output(&self, program: &str, args: &[String]) -> io::Result<(i32, String)> {
        let out = Command::new(program).args(args).output()?;
        Ok((
            out.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&out.stdout).into_owned(),
        ))
    }
}

/// Serial numbers in `nrfjprog --ids` output
pub fn parse_serials(output: &str) -> Vec<u64> {
    output
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(serial) => Some(serial),
            Err(e) => {
                log::warn!("Ignoring serial number '{}': {}", s, e);
                None
            }
        })
        .collect()
}

/// Debug probe access through nrfjprog
pub struct Nrfjprog<R = SystemRunner> {
    runner: R,
    progress: bool,
}

impl Nrfjprog<SystemRunner> {
    /// Use the nrfjprog found in `PATH`
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for Nrfjprog<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Nrfjprog<R> {
    /// Use a custom command runner
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            progress: false,
        }
    }

    /// Show a progress bar during fleet passes
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn nrfjprog(&self, args: &[String]) -> bool {
        log::debug!("{} {}", NRFJPROG, args.join(" "));
        match self.runner.status(NRFJPROG, args) {
            Ok(0) => true,
            Ok(code) => {
                log::debug!("{} exited with {}", NRFJPROG, code);
                false
            }
            Err(e) => {
                log::error!("Failed to run {}: {}", NRFJPROG, e);
                false
            }
        }
    }

    fn reset(&self, serial: u64) -> bool {
        self.nrfjprog(&args(&["-r", "--snr", &serial.to_string()]))
    }

    fn recover(&self, serial: u64) -> bool {
        let snr = serial.to_string();
        self.nrfjprog(&args(&["--recover", "--coprocessor", "CP_NETWORK", "--snr", &snr]))
            && self.nrfjprog(&args(&["--recover", "--snr", &snr]))
    }

    fn program_core(
        &self,
        dev: &DeviceRecord,
        core: Core,
        bootloader: Option<BootloaderMode>,
    ) -> bool {
        let (hex, erase, coprocessor) = match core {
            Core::App => (&dev.hex_path_app, "--chiperase", "CP_APPLICATION"),
            Core::Net => (&dev.hex_path_net, "--sectorerase", "CP_NETWORK"),
        };
        let Some(hex) = hex else {
            log::error!("No {} core hex file for {}", core, dev);
            return false;
        };

        log::info!("Programming {} core on: {}", core, dev);
        let snr = dev.serial.to_string();
        let hex = hex.display().to_string();
        let mut cmd = args(&["--program", &hex, "-f", "NRF53", "-q", "--snr", &snr, erase]);
        if core == Core::App && bootloader == Some(BootloaderMode::External) {
            cmd.push("--qspichiperase".into());
        }
        cmd.extend(args(&["--coprocessor", coprocessor]));
        self.nrfjprog(&cmd)
    }

    /// Program pending cores, net core first. Stops at the first failure.
    fn program_pending(&self, dev: &mut DeviceRecord, bootloader: Option<BootloaderMode>) -> bool {
        for core in [Core::Net, Core::App] {
            let status = dev.core_status(core);
            if status != SelectFlags::Tbd && status != SelectFlags::Fail {
                continue;
            }
            let ok = self.program_core(dev, core, bootloader);
            let flag = dev.core_status_mut(core);
            if status == SelectFlags::Fail {
                flag.recover(ok);
            } else {
                flag.complete(ok);
            }
            if !ok {
                return false;
            }
        }
        true
    }

    fn service(&self, dev: &mut DeviceRecord, bootloader: Option<BootloaderMode>) {
        if dev.only_reboot == SelectFlags::Tbd {
            log::info!("Resetting {}", dev);
            let ok = self.reset(dev.serial);
            dev.only_reboot.complete(ok);
            return;
        }

        if !self.program_pending(dev, bootloader) && dev.recover_on_fail {
            log::warn!("Programming failed on {}, recovering", dev);
            if self.recover(dev.serial) {
                self.program_pending(dev, bootloader);
            } else {
                log::error!("Recovery failed on {}", dev);
            }
        }

        let programmed = dev.core_app == SelectFlags::Done || dev.core_net == SelectFlags::Done;
        if programmed && !self.reset(dev.serial) {
            log::warn!("Reset after programming failed on {}", dev);
        }
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl<R: CommandRunner> ProbeScanner for Nrfjprog<R> {
    fn list(&mut self) -> Result<Vec<u64>, ProbeError> {
        let (code, stdout) = self.runner.output(NRFJPROG, &args(&["--ids"]))?;
        if code != 0 {
            return Err(ProbeError::Failed(code));
        }
        let serials = parse_serials(&stdout);
        if serials.is_empty() {
            log::warn!("No programmer/debugger connected to PC");
        }
        Ok(serials)
    }
}

impl<R: CommandRunner> FleetProgrammer for Nrfjprog<R> {
    fn run(
        &mut self,
        devices: &mut [DeviceRecord],
        bootloader: Option<BootloaderMode>,
        sequential: bool,
    ) {
        let pending: Vec<&mut DeviceRecord> = devices.iter_mut().filter(|d| d.connected).collect();

        let pb = if self.progress {
            ProgressBar::new(pending.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} boards",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }

        let this = &*self;
        if sequential {
            for dev in pending {
                this.service(dev, bootloader);
                pb.inc(1);
            }
        } else {
            thread::scope(|s| {
                for dev in pending {
                    let pb = pb.clone();
                    s.spawn(move || {
                        this.service(dev, bootloader);
                        pb.inc(1);
                    });
                }
            });
        }
        pb.finish_and_clear();
    }
}
