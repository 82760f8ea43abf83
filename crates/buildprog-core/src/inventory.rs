//! Device inventory loading and probe merging
//!
//! The inventory is a JSON list maintained by the developer, one entry per
//! development kit on the bench:
//!
//! ```json
//! [
//!     { "nrf5340_audio_dk_snr": 1000, "nrf5340_audio_dk_dev": "headset", "channel": "left" },
//!     { "nrf5340_audio_dk_snr": 1001, "nrf5340_audio_dk_dev": "gateway", "channel": "NA" }
//! ]
//! ```

use crate::device::{Channel, DeviceRecord};
use crate::error::InventoryError;
use crate::options::{DeviceRole, RunOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding the inventory location
pub const INVENTORY_ENV: &str = "AUDIO_KIT_SERIAL_NUMBERS_JSON";

/// File name of the default inventory
pub const DEFAULT_INVENTORY_FILE: &str = "nrf5340_audio_dk_devices.json";

/// One inventory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Debug probe serial number
    #[serde(rename = "nrf5340_audio_dk_snr")]
    pub serial: u64,
    /// Stereo channel
    pub channel: Channel,
    /// Role of the board
    #[serde(rename = "nrf5340_audio_dk_dev")]
    pub role: DeviceRole,
}

/// Load an inventory file
pub fn load_file(path: &Path) -> Result<Vec<InventoryEntry>, InventoryError> {
    let content = fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<InventoryEntry> =
        serde_json::from_str(&content).map_err(|source| InventoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Loaded {} inventory entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Combine inventory entries with the serial numbers of attached probes
///
/// Output order follows the inventory.
pub fn merge(entries: &[InventoryEntry], attached: &[u64], options: &RunOptions) -> Vec<DeviceRecord> {
    entries
        .iter()
        .map(|e| {
            DeviceRecord::new(
                e.serial,
                e.channel,
                e.role,
                attached.contains(&e.serial),
                options,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INVENTORY: &str = r#"
    [
        { "nrf5340_audio_dk_snr": 1000, "nrf5340_audio_dk_dev": "headset", "channel": "left" },
        { "nrf5340_audio_dk_snr": 1001, "nrf5340_audio_dk_dev": "headset", "channel": "right" },
        { "nrf5340_audio_dk_snr": 1002, "nrf5340_audio_dk_dev": "gateway", "channel": "NA" }
    ]
    "#;

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INVENTORY.as_bytes()).unwrap();

        let entries = load_file(file.path()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].serial, 1000);
        assert_eq!(entries[1].channel, Channel::Right);
        assert_eq!(entries[2].role, DeviceRole::Gateway);
        assert_eq!(entries[2].channel, Channel::NotApplicable);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_file(&missing), Err(InventoryError::Read { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"[{ "nrf5340_audio_dk_snr": "x" }]"#).unwrap();
        assert!(matches!(load_file(&bad), Err(InventoryError::Parse { .. })));

        let both = dir.path().join("both.json");
        fs::write(
            &both,
            r#"[{ "nrf5340_audio_dk_snr": 1, "nrf5340_audio_dk_dev": "both", "channel": "left" }]"#,
        )
        .unwrap();
        assert!(matches!(load_file(&both), Err(InventoryError::Parse { .. })));
    }

    #[test]
    fn test_merge_connection_and_order() {
        let entries: Vec<InventoryEntry> = serde_json::from_str(INVENTORY).unwrap();
        let options = RunOptions::resolve(Default::default(), None).unwrap();

        let devices = merge(&entries, &[1002, 1000, 42], &options);
        let serials: Vec<u64> = devices.iter().map(|d| d.serial).collect();
        assert_eq!(serials, vec![1000, 1001, 1002]);
        let connected: Vec<bool> = devices.iter().map(|d| d.connected).collect();
        assert_eq!(connected, vec![true, false, true]);

        let none = merge(&entries, &[], &options);
        assert!(none.iter().all(|d| !d.connected));
    }
}
