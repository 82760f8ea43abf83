//! Hex image lookup for programming
//!
//! Paths are computed only; nothing in the build trees is touched.

use crate::device::{DeviceRecord, SelectFlags};
use crate::error::ArtifactError;
use crate::options::RunOptions;
use crate::workspace::Workspace;
use std::fs;
use std::path::{Path, PathBuf};

/// Application image without bootloader
pub const APP_HEX: &str = "zephyr/zephyr.hex";
/// Application image merged with MCUboot
pub const APP_MERGED_HEX: &str = "zephyr/merged.hex";
/// Net-core image signed for the bootloader
pub const NET_SIGNED_HEX: &str = "zephyr/net_core_app_signed.hex";
/// Net-core child image of an alternate-controller build
pub const NET_CHILD_HEX: &str = "hci_ipc/zephyr/zephyr.hex";

const NET_PRECOMPILED_PREFIX: &str = "ble5-ctr-rpmsg_";

/// Fill in the hex paths a device will be programmed with
pub fn resolve_hex_paths(
    dev: &mut DeviceRecord,
    options: &RunOptions,
    workspace: &Workspace,
) -> Result<(), ArtifactError> {
    let variant = options.build.ok_or(ArtifactError::NoBuildVariant)?;
    let out = workspace.output_dir(dev.role, variant);

    if !options.controller.is_default() {
        dev.hex_path_app = Some(out.join(APP_HEX));
        dev.hex_path_net = Some(out.join(NET_CHILD_HEX));
        return Ok(());
    }

    if dev.core_app == SelectFlags::Tbd {
        let name = if options.bootloader.is_some() {
            APP_MERGED_HEX
        } else {
            APP_HEX
        };
        dev.hex_path_app = Some(out.join(name));
    }

    if dev.core_net == SelectFlags::Tbd {
        if options.bootloader.is_some() {
            dev.hex_path_net = Some(out.join(NET_SIGNED_HEX));
        } else {
            let dir = workspace.net_precompiled_dir();
            let mut found = find_net_hex(&dir);
            if found.len() != 1 {
                return Err(ArtifactError::NetHexAmbiguous {
                    dir,
                    found: found.len(),
                });
            }
            let hex = found.remove(0);
            log::info!("Using NET hex: {} for {}", hex.display(), dev);
            dev.hex_path_net = Some(hex);
        }
    }

    Ok(())
}

/// Precompiled net-core images in `dir` (`ble5-ctr-rpmsg_<digit>*.hex`)
///
/// A missing directory yields no images.
pub fn find_net_hex(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        log::debug!("Cannot read {}", dir.display());
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(is_net_hex_name))
        .collect();
    found.sort();
    found
}

fn is_net_hex_name(name: &str) -> bool {
    name.strip_prefix(NET_PRECOMPILED_PREFIX)
        .and_then(|rest| rest.strip_suffix(".hex"))
        .and_then(|version| version.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}
