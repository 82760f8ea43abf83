//! Per-board run state

use crate::options::{Controller, Core, DeviceRole, RunOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Status of one action on one board
///
/// Legal transitions are `Tbd -> Done`, `Tbd -> Fail` and, through a
/// recovery retry only, `Fail -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectFlags {
    /// Not part of this run
    Not,
    /// Selected, pending
    Tbd,
    /// Succeeded
    Done,
    /// Failed
    Fail,
}

impl SelectFlags {
    /// Report label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "Not selected",
            Self::Tbd => "Selected TBD",
            Self::Done => "Selected done",
            Self::Fail => "Selected ERR",
        }
    }

    /// Record the outcome of a pending action. Other states are left alone.
    pub fn complete(&mut self, ok: bool) {
        if *self == Self::Tbd {
            *self = if ok { Self::Done } else { Self::Fail };
        }
    }

    /// Record the outcome of a retry after recovery. Only `Fail` can change.
    pub fn recover(&mut self, ok: bool) {
        if *self == Self::Fail && ok {
            *self = Self::Done;
        }
    }
}

impl fmt::Display for SelectFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stereo channel a headset is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    /// Left channel
    #[serde(rename = "left", alias = "Left")]
    Left,
    /// Right channel
    #[serde(rename = "right", alias = "Right")]
    Right,
    /// No channel (gateways)
    #[serde(rename = "NA", alias = "na")]
    NotApplicable,
}

impl Channel {
    /// Inventory spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::NotApplicable => "NA",
        }
    }
}

/// One development kit from the inventory, with its state for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Debug probe serial number
    pub serial: u64,
    /// Stereo channel
    pub channel: Channel,
    /// Role the board is flashed for
    pub role: DeviceRole,
    /// Probe currently attached
    pub connected: bool,
    /// Reboot-only status
    pub only_reboot: SelectFlags,
    /// Application core programming status
    pub core_app: SelectFlags,
    /// Network core programming status
    pub core_net: SelectFlags,
    /// Application core image
    pub hex_path_app: Option<PathBuf>,
    /// Network core image
    pub hex_path_net: Option<PathBuf>,
    /// Recover the board if programming fails
    pub recover_on_fail: bool,
    /// Controller variant of the images
    pub controller: Controller,
}

impl DeviceRecord {
    /// Create the run state of an inventory board
    pub fn new(
        serial: u64,
        channel: Channel,
        role: DeviceRole,
        connected: bool,
        options: &RunOptions,
    ) -> Self {
        let selected = options.has_role(role);
        let only_reboot = if options.only_reboot && selected {
            SelectFlags::Tbd
        } else {
            SelectFlags::Not
        };

        let status = |core: Core| {
            if options.only_reboot || !connected || !selected || !options.has_core(core) {
                SelectFlags::Not
            } else {
                SelectFlags::Tbd
            }
        };

        Self {
            serial,
            channel,
            role,
            connected,
            only_reboot,
            core_app: status(Core::App),
            core_net: status(Core::Net),
            hex_path_app: None,
            hex_path_net: None,
            recover_on_fail: options.recover_on_fail,
            controller: options.controller,
        }
    }

    /// Programming status of a core
    pub fn core_status(&self, core: Core) -> SelectFlags {
        match core {
            Core::App => self.core_app,
            Core::Net => self.core_net,
        }
    }

    /// Mutable programming status of a core
    pub fn core_status_mut(&mut self, core: Core) -> &mut SelectFlags {
        match core {
            Core::App => &mut self.core_app,
            Core::Net => &mut self.core_net,
        }
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.serial, self.role, self.channel.as_str())
    }
}
