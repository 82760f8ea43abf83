//! CLI argument parsing

use buildprog_core::options::{
    BootloaderMode, BuildVariant, Controller, CoreSelection, RawOptions, RoleSelection,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "buildprog")]
#[command(
    author,
    version,
    about = "Builds and programs the nRF5340 Audio project on multiple devices",
    long_about = None,
    after_help = "If the environment variable AUDIO_KIT_SERIAL_NUMBERS_JSON contains the \
                  location of a json file, it is used instead of nrf5340_audio_dk_devices.json"
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only reboot, no building or programming
    #[arg(short = 'r', long = "only_reboot")]
    pub only_reboot: bool,

    /// Program and reboot the nRF5340 Audio DKs
    #[arg(short, long)]
    pub program: bool,

    /// Select which cores to include in build
    #[arg(short, long, value_enum)]
    pub core: Option<CoreSelection>,

    /// Build cleanly
    #[arg(long)]
    pub pristine: bool,

    /// Select the build type
    #[arg(short, long, value_enum)]
    pub build: Option<BuildVariant>,

    /// Build the application core for ordinary headset (earbuds/headphone) use
    /// or gateway (USB dongle) use
    #[arg(short, long, value_enum)]
    pub device: Option<RoleSelection>,

    /// Run nrfjprog sequentially instead of in parallel
    #[arg(short, long = "sequential")]
    pub sequential: bool,

    /// Recover device if programming fails
    #[arg(short = 'f', long = "recover_on_fail")]
    pub recover_on_fail: bool,

    /// Controller variant (experimental)
    #[arg(long = "ctlr", value_enum, default_value = "ACS_nRF53", hide = true)]
    pub controller: Controller,

    /// Net core bootloader uses minimal size build. Only for controller: ACS_nRF53
    #[arg(short = 'M', long = "min_b0n")]
    pub min_b0n: bool,

    /// MCUboot with external or internal flash. Only for controller: ACS_nRF53
    #[arg(short = 'm', long = "mcuboot", value_enum)]
    pub mcuboot: Option<BootloaderMode>,

    /// Set when using nRF21540 for extra TX power
    #[arg(long)]
    pub nrf21540: bool,

    /// Use custom Bluetooth device name
    #[arg(long = "custom_bt_name", alias = "cn", num_args = 0..)]
    pub custom_bt_name: Option<Vec<String>>,

    /// Generate a user specific Bluetooth device name. Note that this will put
    /// the computer user name on air in clear text
    #[arg(short = 'u', long = "user_bt_name")]
    pub user_bt_name: bool,

    /// Device inventory (JSON list of serial number, device and channel)
    #[arg(long, env = "AUDIO_KIT_SERIAL_NUMBERS_JSON")]
    pub inventory: Option<PathBuf>,

    /// nRF5340 Audio application directory
    #[arg(long, default_value = ".")]
    pub app_dir: PathBuf,

    /// SDK root [default: <app-dir>/../..]
    #[arg(long)]
    pub nrf_dir: Option<PathBuf>,
}

impl Cli {
    /// Options for the configuration resolver
    pub fn raw_options(&self) -> RawOptions {
        RawOptions {
            only_reboot: self.only_reboot,
            program: self.program,
            core: self.core,
            device: self.device,
            build: self.build,
            pristine: self.pristine,
            sequential: self.sequential,
            recover_on_fail: self.recover_on_fail,
            controller: self.controller,
            bootloader: self.mcuboot,
            min_b0n: self.min_b0n,
            nrf21540: self.nrf21540,
            custom_bt_name: self.custom_bt_name.clone(),
            user_bt_name: self.user_bt_name,
        }
    }
}
