use std::io;

use thiserror::Error;

/// Everything in here is fatal: the run stops and the binaries print the
/// chain and exit non-zero. Touchpad toggling failures are deliberately
/// absent, those only warn (see [`crate::input`]).
#[derive(Debug, Error)]
pub enum Error {
    #[error("must be run as root")]
    NotRoot,

    #[error("control channel {path} unavailable (is the acpi_call module loaded?)")]
    ChannelUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("writing command to {path} failed")]
    ChannelWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("reading response from {path} failed")]
    ChannelRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed EC response {response:?}")]
    MalformedResponse { response: String },

    #[error("tipping point table has {len} entries, the EC window holds {max}")]
    TableTooLarge { len: usize, max: usize },

    #[error("kernel module image {path} not found")]
    ModuleMissing {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("decompressing kernel module {path} failed")]
    ModuleDecompress {
        path: String,
        #[source]
        source: lzma_rs::error::Error,
    },

    #[error("loading the acpi_call kernel module failed")]
    ModuleLoad {
        #[source]
        source: nix::Error,
    },

    #[error("querying the running kernel release failed")]
    KernelRelease {
        #[source]
        source: nix::Error,
    },

    #[error("reading config file {path} failed")]
    ConfigRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("parsing config file {path} failed")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
