// ulndef/src/protocol/commands/write.rs

use crate::constants::CMD_COMPAT_WRITE;

/// Encode a compatibility-mode WRITE command (0xA0). Framed mode.
///
/// The wire payload is always 16 bytes but the tag only persists the first
/// page; the remaining 12 bytes are zero-padded, never omitted.
pub fn encode_compat_write(page: u32, data: [u8; 4]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + 16);
    buf.push(CMD_COMPAT_WRITE);
    buf.push(page as u8);
    buf.extend_from_slice(&data);
    buf.extend_from_slice(&[0u8; 12]);
    buf
}
