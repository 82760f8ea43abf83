//! Run option resolution
//!
//! The CLI hands over a [`RawOptions`] exactly as the user typed it.
//! [`RunOptions::resolve`] validates the combination and expands it into
//! the normalized form the rest of the engine works from. Validation is
//! fail-fast: the first violated rule is returned and nothing else happens.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest Bluetooth device name the firmware accepts, excluding the terminator
pub const MAX_DEVICE_NAME_LEN: usize = 248 - 1;

/// Prefix of generated user-specific device names
pub const USER_NAME_PREFIX: &str = "AUDIO_DEV_";

/// A core of the nRF5340 SoC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Core {
    /// Application core
    App,
    /// Network (radio) core
    Net,
}

impl fmt::Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::App => "app",
            Self::Net => "net",
        })
    }
}

/// Core selection as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CoreSelection {
    /// Application core only
    App,
    /// Network core only
    Net,
    /// Both cores
    Both,
}

impl CoreSelection {
    /// Expand into the explicit list of cores
    pub fn expand(self) -> Vec<Core> {
        match self {
            Self::App => vec![Core::App],
            Self::Net => vec![Core::Net],
            Self::Both => vec![Core::App, Core::Net],
        }
    }
}

/// Role a development kit plays in the audio system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    /// Earbud / headphone
    Headset,
    /// USB dongle / broadcast source
    Gateway,
}

impl DeviceRole {
    /// Lowercase name as used in directory names and the inventory
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headset => "headset",
            Self::Gateway => "gateway",
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device role selection as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RoleSelection {
    /// Headset builds only
    Headset,
    /// Gateway builds only
    Gateway,
    /// Both roles
    Both,
}

impl RoleSelection {
    /// Expand into the explicit list of roles
    pub fn expand(self) -> Vec<DeviceRole> {
        match self {
            Self::Headset => vec![DeviceRole::Headset],
            Self::Gateway => vec![DeviceRole::Gateway],
            Self::Both => vec![DeviceRole::Gateway, DeviceRole::Headset],
        }
    }
}

/// Firmware build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BuildVariant {
    /// Debug configuration
    Debug,
    /// Release configuration (`prj_release.conf`)
    Release,
}

impl BuildVariant {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

/// Radio link-layer controller the firmware is built against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Controller {
    /// Default audio controller stack
    #[default]
    #[cfg_attr(feature = "clap", value(name = "ACS_nRF53"))]
    AcsNrf53,
    /// SoftDevice Controller (experimental)
    #[cfg_attr(feature = "clap", value(name = "SDC"))]
    Sdc,
}

impl Controller {
    /// Name as spelled on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::AcsNrf53 => "ACS_nRF53",
            Self::Sdc => "SDC",
        }
    }

    /// Whether this is the default controller variant
    pub fn is_default(self) -> bool {
        self == Self::default()
    }
}

/// Where the MCUboot secondary slot lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BootloaderMode {
    /// Internal flash
    Internal,
    /// External QSPI flash
    External,
}

impl BootloaderMode {
    /// Value of `CONFIG_AUDIO_DFU` for this mode
    pub fn dfu_value(self) -> u8 {
        match self {
            Self::Internal => 1,
            Self::External => 2,
        }
    }
}

/// Options exactly as parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    /// Reboot the boards without building or programming
    pub only_reboot: bool,
    /// Program (and reboot) the boards
    pub program: bool,
    /// Core selection
    pub core: Option<CoreSelection>,
    /// Device role selection
    pub device: Option<RoleSelection>,
    /// Build variant
    pub build: Option<BuildVariant>,
    /// Remove output directories before building
    pub pristine: bool,
    /// Program boards one after another
    pub sequential: bool,
    /// Recover a board if programming fails
    pub recover_on_fail: bool,
    /// Controller variant
    pub controller: Controller,
    /// MCUboot mode
    pub bootloader: Option<BootloaderMode>,
    /// Minimal-size net-core bootloader
    pub min_b0n: bool,
    /// nRF21540 front-end module shield
    pub nrf21540: bool,
    /// Custom Bluetooth name, as whitespace-separated tokens
    pub custom_bt_name: Option<Vec<String>>,
    /// Derive the Bluetooth name from the current user
    pub user_bt_name: bool,
}

/// Validated, normalized options for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Selected cores
    pub cores: Vec<Core>,
    /// Selected device roles
    pub roles: Vec<DeviceRole>,
    /// Build variant, if building or programming
    pub build: Option<BuildVariant>,
    /// Remove output directories before building
    pub pristine: bool,
    /// Reboot-only run
    pub only_reboot: bool,
    /// Program after (optionally) building
    pub program: bool,
    /// Program boards one after another
    pub sequential: bool,
    /// Recover a board if programming fails
    pub recover_on_fail: bool,
    /// Controller variant
    pub controller: Controller,
    /// MCUboot mode
    pub bootloader: Option<BootloaderMode>,
    /// Minimal-size net-core bootloader
    pub min_b0n: bool,
    /// nRF21540 front-end module shield
    pub nrf21540: bool,
    /// Bluetooth device name override
    pub device_name: Option<String>,
}

impl RunOptions {
    /// Validate raw options and normalize them
    ///
    /// `user` is the invoking user's login name; it is only consulted when a
    /// user-specific device name is requested.
    pub fn resolve(raw: RawOptions, user: Option<&str>) -> Result<Self, ConfigError> {
        if !raw.controller.is_default() {
            log::warn!("Experimental app - controller combination");
            if raw.nrf21540 || raw.bootloader.is_some() || raw.min_b0n {
                return Err(ConfigError::UnsupportedWithController {
                    default: Controller::AcsNrf53.name(),
                });
            }
        }

        if raw.custom_bt_name.is_some() && raw.user_bt_name {
            return Err(ConfigError::ConflictingDeviceName);
        }
        if raw.min_b0n && raw.bootloader.is_none() {
            return Err(ConfigError::MinimalBootloaderWithoutMode);
        }
        if raw.program && raw.build.is_none() {
            return Err(ConfigError::ProgramWithoutBuild);
        }
        if raw.device.is_none() {
            if raw.only_reboot {
                return Err(ConfigError::MissingDeviceRole("--only_reboot"));
            }
            let builds_app = matches!(raw.core, Some(CoreSelection::App | CoreSelection::Both));
            if raw.build.is_some() && builds_app {
                return Err(ConfigError::MissingDeviceRole("an app core build"));
            }
        }

        let device_name = match (&raw.custom_bt_name, raw.user_bt_name) {
            (Some(tokens), _) => Some(custom_device_name(tokens)),
            (None, true) => Some(user_device_name(user.ok_or(ConfigError::UnknownUser)?)),
            (None, false) => None,
        };

        Ok(Self {
            cores: raw.core.map(CoreSelection::expand).unwrap_or_default(),
            roles: raw.device.map(RoleSelection::expand).unwrap_or_default(),
            build: raw.build,
            pristine: raw.pristine,
            only_reboot: raw.only_reboot,
            program: raw.program,
            sequential: raw.sequential,
            recover_on_fail: raw.recover_on_fail,
            controller: raw.controller,
            bootloader: raw.bootloader,
            min_b0n: raw.min_b0n,
            nrf21540: raw.nrf21540,
            device_name,
        })
    }

    /// Whether the given core was selected
    pub fn has_core(&self, core: Core) -> bool {
        self.cores.contains(&core)
    }

    /// Whether the given role was selected
    pub fn has_role(&self, role: DeviceRole) -> bool {
        self.roles.contains(&role)
    }
}

/// Device name built from the invoking user's login name
pub fn user_device_name(user: &str) -> String {
    bounded_name(&format!("{USER_NAME_PREFIX}{user}"))
}

/// Device name built from custom name tokens
pub fn custom_device_name(tokens: &[String]) -> String {
    bounded_name(&tokens.join("_"))
}

/// Uppercase and cut to at most [`MAX_DEVICE_NAME_LEN`] bytes on a char boundary
fn bounded_name(name: &str) -> String {
    let mut upper = name.to_uppercase();
    if upper.len() > MAX_DEVICE_NAME_LEN {
        let mut end = MAX_DEVICE_NAME_LEN;
        while !upper.is_char_boundary(end) {
            end -= 1;
        }
        upper.truncate(end);
    }
    upper
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_headset() -> RawOptions {
        RawOptions {
            program: true,
            build: Some(BuildVariant::Debug),
            device: Some(RoleSelection::Headset),
            ..Default::default()
        }
    }

    #[test]
    fn test_alternate_controller_rejects_extras() {
        let extras: [fn(&mut RawOptions); 3] = [
            |r: &mut RawOptions| r.nrf21540 = true,
            |r: &mut RawOptions| r.bootloader = Some(BootloaderMode::Internal),
            |r: &mut RawOptions| {
                r.bootloader = Some(BootloaderMode::External);
                r.min_b0n = true;
            },
        ];
        for set in extras {
            let mut raw = program_headset();
            raw.controller = Controller::Sdc;
            set(&mut raw);
            assert!(matches!(
                RunOptions::resolve(raw, None),
                Err(ConfigError::UnsupportedWithController { .. })
            ));
        }
    }

    #[test]
    fn test_alternate_controller_alone_is_accepted() {
        let mut raw = program_headset();
        raw.controller = Controller::Sdc;
        let opts = RunOptions::resolve(raw, None).unwrap();
        assert_eq!(opts.controller, Controller::Sdc);
    }

    #[test]
    fn test_conflicting_names() {
        let mut raw = program_headset();
        raw.custom_bt_name = Some(vec!["my".into(), "kit".into()]);
        raw.user_bt_name = true;
        assert_eq!(
            RunOptions::resolve(raw, Some("alice")),
            Err(ConfigError::ConflictingDeviceName)
        );
    }

    #[test]
    fn test_min_b0n_requires_mode() {
        let mut raw = program_headset();
        raw.min_b0n = true;
        assert_eq!(
            RunOptions::resolve(raw, None),
            Err(ConfigError::MinimalBootloaderWithoutMode)
        );
    }

    #[test]
    fn test_required_combinations() {
        let raw = RawOptions {
            program: true,
            ..Default::default()
        };
        assert_eq!(
            RunOptions::resolve(raw, None),
            Err(ConfigError::ProgramWithoutBuild)
        );

        let raw = RawOptions {
            only_reboot: true,
            ..Default::default()
        };
        assert!(matches!(
            RunOptions::resolve(raw, None),
            Err(ConfigError::MissingDeviceRole(_))
        ));

        let raw = RawOptions {
            build: Some(BuildVariant::Release),
            core: Some(CoreSelection::Both),
            ..Default::default()
        };
        assert!(matches!(
            RunOptions::resolve(raw, None),
            Err(ConfigError::MissingDeviceRole(_))
        ));

        // Net-only builds need no role
        let raw = RawOptions {
            build: Some(BuildVariant::Release),
            core: Some(CoreSelection::Net),
            ..Default::default()
        };
        assert!(RunOptions::resolve(raw, None).is_ok());
    }

    #[test]
    fn test_selection_expansion() {
        let mut raw = program_headset();
        raw.core = Some(CoreSelection::Both);
        raw.device = Some(RoleSelection::Both);
        let opts = RunOptions::resolve(raw, None).unwrap();
        assert_eq!(opts.cores, vec![Core::App, Core::Net]);
        assert_eq!(opts.roles, vec![DeviceRole::Gateway, DeviceRole::Headset]);

        let opts = RunOptions::resolve(RawOptions::default(), None).unwrap();
        assert!(opts.cores.is_empty());
        assert!(opts.roles.is_empty());
    }

    #[test]
    fn test_user_name() {
        let mut raw = program_headset();
        raw.user_bt_name = true;
        let opts = RunOptions::resolve(raw.clone(), Some("alice")).unwrap();
        assert_eq!(opts.device_name.as_deref(), Some("AUDIO_DEV_ALICE"));
        assert_eq!(
            RunOptions::resolve(raw, None),
            Err(ConfigError::UnknownUser)
        );
    }

    #[test]
    fn test_custom_name_joined() {
        let tokens = vec!["bench".to_string(), "kit".to_string(), "3".to_string()];
        assert_eq!(custom_device_name(&tokens), "BENCH_KIT_3");
        assert_eq!(custom_device_name(&[]), "");
    }

    #[test]
    fn test_name_truncation_is_stable() {
        let long = "x".repeat(400);
        let first = user_device_name(&long);
        assert_eq!(first.len(), MAX_DEVICE_NAME_LEN);
        assert_eq!(first, user_device_name(&long));

        // Multi-byte characters are never split
        let wide = vec!["é".repeat(200)];
        let name = custom_device_name(&wide);
        assert!(name.len() <= MAX_DEVICE_NAME_LEN);
        assert!(name.chars().all(|c| c == 'É'));
        assert_eq!(name, custom_device_name(&wide));
    }
}
