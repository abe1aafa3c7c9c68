//! Write-then-read exchanges with the EC through the acpi_call interface.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use log::{debug, info};
use nix::kmod::init_module;
use nix::sys::utsname::uname;

use crate::error::{Error, Result};

/// Pseudo-file exposed by the acpi_call kernel module.
pub const ACPI_CALL_FILE: &str = "/proc/acpi/call";

/// Where dkms installs the module image, relative to the running kernel's
/// module tree.
const MODULE_IMAGE: &str = "extra/acpi_call.ko.xz";

/// One command/response exchange with the EC.
///
/// The profile code talks to the hardware only through this seam, so tests
/// can run it against a recording fake instead of [`ACPI_CALL_FILE`].
pub trait ControlChannel {
    fn call(&mut self, command: &str) -> Result<String>;
}

/// Channel backed by `/proc/acpi/call`.
///
/// The file is opened, used and closed once per direction. The kernel side
/// holds the result of the last written command until the next write, so a
/// write immediately followed by a read forms one exchange.
pub struct AcpiCall {
    path: String,
}

impl AcpiCall {
    pub fn new() -> Self {
        Self {
            path: ACPI_CALL_FILE.to_string(),
        }
    }
}

impl Default for AcpiCall {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlChannel for AcpiCall {
    fn call(&mut self, command: &str) -> Result<String> {
        info!("{}", command);
        {
            let mut channel =
                File::options()
                    .write(true)
                    .open(&self.path)
                    .map_err(|source| Error::ChannelUnavailable {
                        path: self.path.clone(),
                        source,
                    })?;
            channel
                .write_all(command.as_bytes())
                .map_err(|source| Error::ChannelWrite {
                    path: self.path.clone(),
                    source,
                })?;
        }
        let mut channel = File::open(&self.path).map_err(|source| Error::ChannelUnavailable {
            path: self.path.clone(),
            source,
        })?;
        let mut response = String::new();
        channel
            .read_to_string(&mut response)
            .map_err(|source| Error::ChannelRead {
                path: self.path.clone(),
                source,
            })?;
        debug!("response: {:?}", response);
        Ok(response)
    }
}

/// Load the acpi_call module if the channel is not already present.
///
/// The image lives as an xz-compressed object under the running kernel's
/// module tree and takes no parameters.
pub fn ensure_channel() -> Result<()> {
    if Path::new(ACPI_CALL_FILE).exists() {
        debug!("{} already present", ACPI_CALL_FILE);
        return Ok(());
    }
    let sysinfo = uname().map_err(|source| Error::KernelRelease { source })?;
    let path = format!(
        "/lib/modules/{}/{}",
        sysinfo.release().to_string_lossy(),
        MODULE_IMAGE
    );
    info!("loading acpi_call kernel module from {}", path);
    let image = File::open(&path).map_err(|source| Error::ModuleMissing {
        path: path.clone(),
        source,
    })?;
    let mut reader = std::io::BufReader::new(image);
    let mut decomp: Vec<u8> = Vec::new();
    lzma_rs::xz_decompress(&mut reader, &mut decomp).map_err(|source| Error::ModuleDecompress {
        path: path.clone(),
        source,
    })?;
    init_module(&decomp, c"").map_err(|source| Error::ModuleLoad { source })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_channel_reports_unavailable() {
        let mut channel = AcpiCall {
            path: "/nonexistent/acpi/call".to_string(),
        };
        let err = channel
            .call(r"\_SB.PCI0.LPCB.EC0.RRAM 0x51d")
            .unwrap_err();
        assert!(matches!(err, Error::ChannelUnavailable { .. }));
    }
}
