//! Thermal tipping point table in EC memory.
//!
//! The fan firmware steps fan speed whenever the temperature crosses one of
//! eight thresholds stored at consecutive EC addresses. Rewriting them with
//! higher values shifts the whole curve up, which keeps the fan silent
//! while the machine idles.

use log::{debug, info};

use crate::acpi::ControlChannel;
use crate::error::{Error, Result};

/// First tipping point slot in EC memory.
pub const TABLE_OFFSET: u16 = 0x537;
/// Number of tipping point slots the EC exposes.
pub const TABLE_SLOTS: usize = 8;
/// Orientation flag, non-zero when the lid is folded into tablet use.
pub const FLIP_FLAG_OFFSET: u16 = 0x51d;

/// Factory thresholds.
pub const DEFAULT_TIPPING_POINTS: [u8; TABLE_SLOTS] = [35, 40, 45, 50, 55, 60, 65, 80];
/// Raised thresholds; the fan stays off at idle temperatures.
pub const QUIET_TIPPING_POINTS: [u8; TABLE_SLOTS] = [48, 50, 53, 57, 61, 65, 70, 80];

pub struct ThermalTable<C> {
    channel: C,
}

impl<C: ControlChannel> ThermalTable<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Write `tipping_points` into consecutive slots starting at
    /// [`TABLE_OFFSET`], in index order, one exchange per slot. Oversized
    /// tables are rejected before the first write.
    pub fn update_table(&mut self, tipping_points: &[u8]) -> Result<()> {
        if tipping_points.len() > TABLE_SLOTS {
            return Err(Error::TableTooLarge {
                len: tipping_points.len(),
                max: TABLE_SLOTS,
            });
        }
        for (i, t) in tipping_points.iter().enumerate() {
            let addr = TABLE_OFFSET + i as u16;
            let command = format!(r"\_SB.PCI0.LPCB.EC0.WRAM {:#x} {:#x}", addr, t);
            self.channel.call(&command)?;
        }
        Ok(())
    }

    /// Read one byte of EC memory. The response is hex text up to the
    /// first NUL terminator, with or without a `0x` prefix.
    pub fn read_value(&mut self, addr: u16) -> Result<u64> {
        let command = format!(r"\_SB.PCI0.LPCB.EC0.RRAM {:#x}", addr);
        let response = self.channel.call(&command)?;
        parse_response(&response)
    }

    pub fn is_flipped(&mut self) -> Result<bool> {
        let raw = self.read_value(FLIP_FLAG_OFFSET)?;
        debug!("flip flag at {:#x} reads {:#x}", FLIP_FLAG_OFFSET, raw);
        Ok(raw != 0)
    }

    pub fn set_quiet_profile(&mut self) -> Result<()> {
        info!("Setting quiet cooling profile. It may take a few minutes for it to become active.");
        self.update_table(&QUIET_TIPPING_POINTS)
    }

    pub fn set_default_profile(&mut self) -> Result<()> {
        info!("Setting default cooling profile.");
        self.update_table(&DEFAULT_TIPPING_POINTS)
    }
}

fn parse_response(raw: &str) -> Result<u64> {
    let field = raw.split('\0').next().unwrap_or_default().trim();
    let digits = field.strip_prefix("0x").unwrap_or(field);
    u64::from_str_radix(digits, 16).map_err(|_| Error::MalformedResponse {
        response: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Records every command and replays canned responses.
    struct FakeChannel {
        commands: Vec<String>,
        responses: VecDeque<String>,
    }

    impl FakeChannel {
        fn new() -> Self {
            Self {
                commands: Vec::new(),
                responses: VecDeque::new(),
            }
        }

        fn respond(mut self, response: &str) -> Self {
            self.responses.push_back(response.to_string());
            self
        }
    }

    impl ControlChannel for FakeChannel {
        fn call(&mut self, command: &str) -> Result<String> {
            self.commands.push(command.to_string());
            Ok(self
                .responses
                .pop_front()
                .unwrap_or_else(|| "0x0\0".to_string()))
        }
    }

    #[test]
    fn writes_use_exact_wram_syntax() {
        let mut table = ThermalTable::new(FakeChannel::new());
        table.update_table(&[35]).unwrap();
        assert_eq!(
            table.channel.commands,
            vec![r"\_SB.PCI0.LPCB.EC0.WRAM 0x537 0x23"]
        );
    }

    #[test]
    fn quiet_profile_writes_every_slot_in_order() {
        let mut table = ThermalTable::new(FakeChannel::new());
        table.set_quiet_profile().unwrap();
        assert_eq!(table.channel.commands.len(), 8);
        assert_eq!(
            table.channel.commands[0],
            r"\_SB.PCI0.LPCB.EC0.WRAM 0x537 0x30"
        );
        assert_eq!(
            table.channel.commands[1],
            r"\_SB.PCI0.LPCB.EC0.WRAM 0x538 0x32"
        );
        assert_eq!(
            table.channel.commands[7],
            r"\_SB.PCI0.LPCB.EC0.WRAM 0x53e 0x50"
        );
    }

    #[test]
    fn default_profile_starts_at_factory_threshold() {
        let mut table = ThermalTable::new(FakeChannel::new());
        table.set_default_profile().unwrap();
        assert_eq!(table.channel.commands.len(), 8);
        assert_eq!(
            table.channel.commands[0],
            r"\_SB.PCI0.LPCB.EC0.WRAM 0x537 0x23"
        );
    }

    #[test]
    fn short_table_writes_only_its_entries() {
        let mut table = ThermalTable::new(FakeChannel::new());
        table.update_table(&[48, 50, 53]).unwrap();
        assert_eq!(table.channel.commands.len(), 3);
        assert_eq!(
            table.channel.commands[2],
            r"\_SB.PCI0.LPCB.EC0.WRAM 0x539 0x35"
        );
    }

    #[test]
    fn oversized_table_rejected_before_any_write() {
        let mut table = ThermalTable::new(FakeChannel::new());
        let err = table.update_table(&[0; 9]).unwrap_err();
        assert!(matches!(err, Error::TableTooLarge { len: 9, max: 8 }));
        assert!(table.channel.commands.is_empty());
    }

    #[test]
    fn read_value_parses_up_to_the_nul_terminator() {
        let mut table = ThermalTable::new(FakeChannel::new().respond("1\0\0\0\0\0"));
        assert_eq!(table.read_value(FLIP_FLAG_OFFSET).unwrap(), 1);
        assert_eq!(
            table.channel.commands,
            vec![r"\_SB.PCI0.LPCB.EC0.RRAM 0x51d"]
        );
    }

    #[test]
    fn read_value_ignores_bytes_after_the_terminator() {
        let mut table = ThermalTable::new(FakeChannel::new().respond("0x2a\0junk"));
        assert_eq!(table.read_value(0x538).unwrap(), 0x2a);
    }

    #[test]
    fn read_value_rejects_non_hex_response() {
        let mut table = ThermalTable::new(FakeChannel::new().respond("not hex"));
        let err = table.read_value(FLIP_FLAG_OFFSET).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn is_flipped_follows_the_flag() {
        let mut table = ThermalTable::new(FakeChannel::new().respond("1\0\0\0\0"));
        assert!(table.is_flipped().unwrap());

        let mut table = ThermalTable::new(FakeChannel::new().respond("0\0\0\0\0"));
        assert!(!table.is_flipped().unwrap());
    }

    #[test]
    fn quiet_profile_plus_flip_read_is_nine_exchanges() {
        let mut table = ThermalTable::new(FakeChannel::new());
        table.set_quiet_profile().unwrap();
        table.is_flipped().unwrap();
        assert_eq!(table.channel.commands.len(), 9);
        assert_eq!(
            table.channel.commands[8],
            r"\_SB.PCI0.LPCB.EC0.RRAM 0x51d"
        );
    }
}
