//! Device status table

use crate::device::{DeviceRecord, SelectFlags};
use colored::Colorize;
use tabled::builder::Builder as TableBuilder;

const HEADER: [&str; 6] = [
    "snr",
    "snr conn",
    "device",
    "only reboot",
    "core app programmed",
    "core net programmed",
];

fn flag_cell(status: SelectFlags) -> String {
    match status {
        SelectFlags::Fail => status.as_str().red().to_string(),
        SelectFlags::Done => status.as_str().green().to_string(),
        _ => status.as_str().to_string(),
    }
}

fn connection_cell(connected: bool) -> String {
    let text = if connected { "True" } else { "False" };
    if connected {
        text.green().to_string()
    } else {
        text.yellow().to_string()
    }
}

/// Render one row per device
pub fn render(devices: &[DeviceRecord]) -> String {
    let mut builder = TableBuilder::default();
    builder.push_record(HEADER);
    for dev in devices {
        builder.push_record([
            dev.serial.to_string(),
            connection_cell(dev.connected),
            dev.role.to_string(),
            flag_cell(dev.only_reboot),
            flag_cell(dev.core_app),
            flag_cell(dev.core_net),
        ]);
    }
    builder.build().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Channel;
    use crate::options::{DeviceRole, RunOptions};
    use std::sync::Mutex;

    // The colour override is process global
    static COLOR: Mutex<()> = Mutex::new(());

    #[test]
    fn test_render_rows() {
        let _guard = COLOR.lock().unwrap();
        colored::control::set_override(false);
        let opts = RunOptions::resolve(Default::default(), None).unwrap();
        let mut ok = DeviceRecord::new(683462, Channel::Left, DeviceRole::Headset, true, &opts);
        ok.core_app = SelectFlags::Done;
        let mut bad = DeviceRecord::new(1001, Channel::NotApplicable, DeviceRole::Gateway, false, &opts);
        bad.core_net = SelectFlags::Fail;

        let table = render(&[ok.clone(), bad]);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines.iter().any(|l| l.contains("core app programmed")));

        let row = lines.iter().find(|l| l.contains("683462")).unwrap();
        assert!(row.contains("True"));
        assert!(row.contains("headset"));
        assert!(row.contains("Selected done"));

        let row = lines.iter().find(|l| l.contains("1001")).unwrap();
        assert!(row.contains("False"));
        assert!(row.contains("Selected ERR"));

        // Rendering is read-only
        assert_eq!(ok.core_app, SelectFlags::Done);
    }

    #[test]
    fn test_status_colors() {
        let _guard = COLOR.lock().unwrap();
        colored::control::set_override(true);
        let opts = RunOptions::resolve(Default::default(), None).unwrap();
        let mut dev = DeviceRecord::new(683462, Channel::Left, DeviceRole::Headset, false, &opts);
        dev.core_app = SelectFlags::Done;
        dev.core_net = SelectFlags::Fail;
        let table = render(&[dev]);
        colored::control::unset_override();

        assert!(table.contains("\u{1b}[32mSelected done\u{1b}[0m"));
        assert!(table.contains("\u{1b}[31mSelected ERR\u{1b}[0m"));
        assert!(table.contains("\u{1b}[33mFalse\u{1b}[0m"));
        assert_eq!(flag_cell(SelectFlags::Not), "Not selected");
    }
}
