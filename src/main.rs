use log::{error, info};
use nix::unistd::Uid;

use pavilion_rust::acpi::{self, AcpiCall};
use pavilion_rust::config::{Config, Profile, CONFIG_FILE};
use pavilion_rust::error::Error;
use pavilion_rust::input;
use pavilion_rust::thermal::ThermalTable;

fn check_root() -> Result<(), Error> {
    if Uid::effective().is_root() {
        Ok(())
    } else {
        Err(Error::NotRoot)
    }
}

fn run() -> anyhow::Result<()> {
    check_root()?;
    acpi::ensure_channel()?;
    let config = Config::load(CONFIG_FILE)?;

    let mut table = ThermalTable::new(AcpiCall::new());
    match config.profile {
        Profile::Quiet => info!(
            "Setting quiet cooling profile. It may take a few minutes for it to become active."
        ),
        Profile::Default => info!("Setting default cooling profile."),
    }
    table.update_table(config.points())?;

    if config.flip_mode {
        let flipped = table.is_flipped()?;
        input::set_flip_mode(flipped);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
