//! Error types for buildprog-core
//!
//! Every fatal condition of a run maps to one of the enums below. Per-device
//! programming failures are not errors: they are recorded as
//! [`SelectFlags::Fail`](crate::device::SelectFlags::Fail) on the device.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid or contradictory run options
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Amplifier or bootloader options used with the alternate controller
    #[error("nrf21540 or DFU arguments only accepted when using controller: {default}. Please use standard tools.")]
    UnsupportedWithController {
        /// Name of the default controller variant
        default: &'static str,
    },

    /// Both a custom and a user-specific device name were requested
    #[error("User BT name option is invalid when custom BT name is set")]
    ConflictingDeviceName,

    /// Minimal net-core bootloader requested without a bootloader mode
    #[error("--min_b0n requires a bootloader mode (--mcuboot)")]
    MinimalBootloaderWithoutMode,

    /// Programming requested without a build variant
    #[error("--program requires a build variant (--build)")]
    ProgramWithoutBuild,

    /// A device role is needed for reboot or for an app-core build
    #[error("a device role (--device) is required for {0}")]
    MissingDeviceRole(&'static str),

    /// The invoking user could not be determined for a user-specific name
    #[error("cannot determine the current user name for --user_bt_name")]
    UnknownUser,
}

/// Failure to load the device inventory file
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory file could not be read
    #[error("Failed to read inventory '{}': {source}", path.display())]
    Read {
        /// Inventory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The inventory file is not a valid list of device records
    #[error("Malformed inventory '{}': {source}", path.display())]
    Parse {
        /// Inventory path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of the probe enumeration collaborator
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The enumeration tool could not be started
    #[error("Failed to run probe enumeration: {0}")]
    Io(#[from] io::Error),

    /// The enumeration tool ran but reported failure
    #[error("Probe enumeration exited with status {0}")]
    Failed(i32),
}

/// Failure of a build step
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build command exited non-zero
    #[error("cmake error: {code}")]
    Failed {
        /// Exit code of the build subprocess
        code: i32,
    },

    /// The build command could not be spawned
    #[error("Failed to start build: {0}")]
    Spawn(#[source] io::Error),

    /// A stale output directory could not be removed before a pristine build
    #[error("Failed to remove '{}': {source}", path.display())]
    Clean {
        /// Output directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Failure to locate a firmware image for programming
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    /// The precompiled net-core search did not yield exactly one image
    #[error("Found zero or multiple NET hex files in folder: {}", dir.display())]
    NetHexAmbiguous {
        /// Directory that was searched
        dir: PathBuf,
        /// Number of matching files
        found: usize,
    },

    /// Programming was requested but no build variant is known
    #[error("no build variant selected, cannot locate hex files")]
    NoBuildVariant,
}

/// Any fatal error of a run
#[derive(Debug, Error)]
pub enum Error {
    /// Option validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Inventory could not be loaded
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    /// Probe enumeration failed
    #[error(transparent)]
    Probe(#[from] ProbeError),
    /// A build step failed
    #[error(transparent)]
    Build(#[from] BuildError),
    /// A hex file could not be resolved
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Result type alias using the crate Error type
pub type Result<T> = std::result::Result<T, Error>;
