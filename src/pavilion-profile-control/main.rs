use std::env;
use std::process::exit;

use pavilion_rust::acpi::AcpiCall;
use pavilion_rust::thermal::ThermalTable;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let mode: String = match env::args().nth(1) {
        Some(mode) => mode,
        None => {
            eprintln!("usage: pavilion-profile-control <default|quiet>");
            exit(2);
        }
    };
    let mut table = ThermalTable::new(AcpiCall::new());
    let result = match mode.as_str() {
        "quiet" => table.set_quiet_profile(),
        "default" => table.set_default_profile(),
        _ => {
            eprintln!("Invalid mode: {}. Valid modes are: default, quiet", mode);
            exit(2);
        }
    };
    if let Err(err) = result {
        eprintln!("{:#}", anyhow::Error::from(err));
        exit(1);
    }
}
