//! Build plan synthesis and execution
//!
//! Only the application core is ever built. The network core image is either
//! precompiled or produced as a child image of the application build.

use crate::error::BuildError;
use crate::options::{BuildVariant, Controller, Core, DeviceRole, RunOptions};
use crate::workspace::{Workspace, APP_BOARD};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Runs a build command line
pub trait Builder {
    /// Run `command` through the shell and return its exit code
    fn run(&mut self, command: &str) -> io::Result<i32>;
}

/// One build requested for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildPlan {
    /// Core to build for
    pub core: Core,
    /// Device role
    pub role: DeviceRole,
    /// Build variant
    pub variant: BuildVariant,
    /// Clean rebuild
    pub pristine: bool,
    /// Controller variant
    pub controller: Controller,
    /// The net core image is built as a child image of this build
    pub child_image: bool,
}

/// Concrete build invocation for a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    /// Base build command, `None` when nothing has to be built
    pub command: Option<String>,
    /// Output directory
    pub output_dir: PathBuf,
    /// Compiler definitions, space separated
    pub flags: String,
}

impl BuildInvocation {
    /// Full command line
    ///
    /// `configured` tells whether the output directory already exists. An
    /// existing build tree keeps the definitions it was configured with, so
    /// no flags are passed to it.
    pub fn command_line(&self, configured: bool) -> Option<String> {
        let command = self.command.as_ref()?;
        let mut line = format!("{} -d {}", command, self.output_dir.display());
        if !configured && !self.flags.is_empty() {
            line.push(' ');
            line.push_str(&self.flags);
        }
        Some(line)
    }
}

/// Build plans for the selected cores and roles
pub fn plan_builds(options: &RunOptions) -> Vec<BuildPlan> {
    let Some(variant) = options.build else {
        return Vec::new();
    };
    if !options.has_core(Core::App) {
        return Vec::new();
    }

    let child_image = options.has_core(Core::Net);
    [DeviceRole::Headset, DeviceRole::Gateway]
        .into_iter()
        .filter(|role| options.has_role(*role))
        .map(|role| BuildPlan {
            core: Core::App,
            role,
            variant,
            pristine: options.pristine,
            controller: options.controller,
            child_image,
        })
        .collect()
}

/// Command, output directory and flags for a plan
pub fn synthesize(plan: &BuildPlan, options: &RunOptions, workspace: &Workspace) -> BuildInvocation {
    match plan.core {
        Core::Net => BuildInvocation {
            command: None,
            output_dir: workspace.net_precompiled_dir(),
            flags: String::new(),
        },
        Core::App => {
            let mut command = format!(
                "west build {} -b {}",
                workspace.app_dir().display(),
                APP_BOARD
            );
            if plan.pristine {
                command.push_str(" -p");
            }
            BuildInvocation {
                command: Some(command),
                output_dir: workspace.output_dir(plan.role, plan.variant),
                flags: app_flags(plan, options).join(" "),
            }
        }
    }
}

fn app_flags(plan: &BuildPlan, options: &RunOptions) -> Vec<String> {
    let mut flags = Vec::new();

    let dev = match plan.role {
        DeviceRole::Headset => 1,
        DeviceRole::Gateway => 2,
    };
    flags.push(format!("-DCONFIG_AUDIO_DEV={dev}"));

    if plan.variant == BuildVariant::Release {
        let mut release = String::from("-DCONF_FILE=prj_release.conf");
        if cfg!(windows) {
            release = release.replace('\\', "/");
        }
        flags.push(release);
    }

    if let Some(mode) = options.bootloader {
        flags.push(format!("-DCONFIG_AUDIO_DFU={}", mode.dfu_value()));
    }
    if options.min_b0n {
        flags.push("-DCONFIG_B0N_MINIMAL=y".into());
    }

    if !plan.controller.is_default() {
        flags.push("-DCONFIG_BT_LL_ACS_NRF53=n".into());
        if !plan.child_image {
            flags.push("-DCONFIG_NCS_INCLUDE_RPMSG_CHILD_IMAGE=n".into());
        }
    }

    if options.nrf21540 {
        flags.push("-DSHIELD=nrf21540ek_fwd".into());
    }

    if let Some(name) = &options.device_name {
        flags.push(format!("-DCONFIG_BT_DEVICE_NAME=\\\"{name}\\\""));
    }

    flags
}

/// Run the build for one plan
pub fn run_build(
    plan: &BuildPlan,
    options: &RunOptions,
    workspace: &Workspace,
    builder: &mut dyn Builder,
) -> Result<(), BuildError> {
    let invocation = synthesize(plan, options, workspace);
    let dir = &invocation.output_dir;

    if invocation.command.is_some() && plan.pristine && dir.exists() {
        log::debug!("Removing {}", dir.display());
        fs::remove_dir_all(dir).map_err(|source| BuildError::Clean {
            path: dir.clone(),
            source,
        })?;
    }

    let Some(line) = invocation.command_line(dir.exists()) else {
        log::info!("Net core uses precompiled hex or child image");
        return Ok(());
    };

    log::info!("Run: {}", line);
    let code = builder.run(&line).map_err(BuildError::Spawn)?;
    if code != 0 {
        return Err(BuildError::Failed { code });
    }
    Ok(())
}
