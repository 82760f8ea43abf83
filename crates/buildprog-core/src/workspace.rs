//! Source and output locations

use crate::options::{BuildVariant, DeviceRole};
use std::path::{Path, PathBuf};

/// Board identifier of the application core
pub const APP_BOARD: &str = "nrf5340_audio_dk_nrf5340_cpuapp";

/// Precompiled net-core images, relative to the SDK root
const NET_PRECOMPILED_DIR: &str = "lib/bin/bt_ll_acs_nrf53/bin";

/// Locations of the application sources and the SDK they live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    app_dir: PathBuf,
    sdk_dir: PathBuf,
}

impl Workspace {
    /// Application directory and SDK root given explicitly
    pub fn new(app_dir: impl Into<PathBuf>, sdk_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            sdk_dir: sdk_dir.into(),
        }
    }

    /// Application directory with the SDK root two levels up
    /// (`<sdk>/applications/nrf5340_audio`)
    pub fn from_app_dir(app_dir: impl Into<PathBuf>) -> Self {
        let app_dir = app_dir.into();
        let sdk_dir = app_dir.join("../..");
        Self { app_dir, sdk_dir }
    }

    /// Application source directory
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// SDK root
    pub fn sdk_dir(&self) -> &Path {
        &self.sdk_dir
    }

    /// Build output directory of an application core image
    pub fn output_dir(&self, role: DeviceRole, variant: BuildVariant) -> PathBuf {
        self.app_dir
            .join("build")
            .join(format!("dev_{}", role.as_str()))
            .join(format!("build_{}", variant.as_str()))
    }

    /// Directory holding precompiled net-core images
    pub fn net_precompiled_dir(&self) -> PathBuf {
        self.sdk_dir.join(NET_PRECOMPILED_DIR)
    }

    /// Default inventory location
    pub fn default_inventory(&self) -> PathBuf {
        self.app_dir
            .join("tools/buildprog")
            .join(crate::inventory::DEFAULT_INVENTORY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dirs_are_distinct() {
        let ws = Workspace::new("/src/app", "/src");
        let headset = ws.output_dir(DeviceRole::Headset, BuildVariant::Release);
        let gateway = ws.output_dir(DeviceRole::Gateway, BuildVariant::Release);
        assert_eq!(headset, PathBuf::from("/src/app/build/dev_headset/build_release"));
        assert_eq!(gateway, PathBuf::from("/src/app/build/dev_gateway/build_release"));
        assert_ne!(
            headset,
            ws.output_dir(DeviceRole::Headset, BuildVariant::Debug)
        );
    }

    #[test]
    fn test_net_dir() {
        let ws = Workspace::new("/sdk/applications/nrf5340_audio", "/sdk");
        assert_eq!(
            ws.net_precompiled_dir(),
            PathBuf::from("/sdk/lib/bin/bt_ll_acs_nrf53/bin")
        );
        let derived = Workspace::from_app_dir("/sdk/applications/nrf5340_audio");
        assert_eq!(derived.sdk_dir(), Path::new("/sdk/applications/nrf5340_audio/../.."));
    }
}
