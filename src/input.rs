//! Touchpad selection for the convertible's two input surfaces.
//!
//! The machine carries two pads, the regular clamshell touchpad and the
//! one active in tablet use. Only one of them should be alive at a time,
//! otherwise the folded-back pad keeps registering palm touches.

use std::process::Command;

use log::{info, warn};

/// Clamshell touchpad, as X11 reports it.
pub const CLAMSHELL_TOUCHPAD: &str = "ELAN1300:00 04F3:3028 Touchpad";
/// Pad that takes over when the lid is folded.
pub const TABLET_TOUCHPAD: &str = "FTSC1000:00 2808:5120";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Enable,
    Disable,
}

impl ToggleAction {
    fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Enable
        } else {
            Self::Disable
        }
    }

    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

/// Which pad gets which action for a given flip state. Exactly one device
/// ends up enabled.
pub fn toggle_plan(flipped: bool) -> [(ToggleAction, &'static str); 2] {
    [
        (ToggleAction::from_enabled(!flipped), CLAMSHELL_TOUCHPAD),
        (ToggleAction::from_enabled(flipped), TABLET_TOUCHPAD),
    ]
}

/// Apply the plan through xinput. Toggling is best effort: spawn errors
/// and non-zero exits warn and the run continues.
pub fn set_flip_mode(flipped: bool) {
    info!("Flipped: {}", flipped);
    for (action, device) in toggle_plan(flipped) {
        xinput(action, device);
    }
}

fn xinput(action: ToggleAction, device: &str) {
    match Command::new("xinput")
        .arg(action.as_arg())
        .arg(device)
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(
            "xinput {} {:?} exited with {}",
            action.as_arg(),
            device,
            status
        ),
        Err(err) => warn!("could not run xinput {} {:?}: {}", action.as_arg(), device, err),
    }
}
