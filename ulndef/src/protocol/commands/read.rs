// ulndef/src/protocol/commands/read.rs

use crate::constants::CMD_READ;

/// Encode a READ command (0x30). Framed mode; the reader handles the CRC.
///
/// The tag replies with 16 bytes: four consecutive pages starting at `page`.
pub fn encode_read(page: u32) -> Vec<u8> {
    vec![CMD_READ, page as u8]
}
