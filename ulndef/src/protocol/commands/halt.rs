// ulndef/src/protocol/commands/halt.rs

use crate::constants::CMD_HALT;
use crate::protocol::crc::append_crc;

/// Encode an ISO 14443-3 HLTA command (0x50 0x00). Raw mode, CRC appended.
///
/// A halted tag does not answer; transport errors after HLTA are expected.
pub fn encode_halt() -> Vec<u8> {
    let mut buf = CMD_HALT.to_vec();
    append_crc(&mut buf);
    buf
}
