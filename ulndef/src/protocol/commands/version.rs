// ulndef/src/protocol/commands/version.rs

use crate::constants::CMD_GET_VERSION;
use crate::protocol::crc::append_crc;

/// Encode an EV1 GET_VERSION command (0x60). Raw mode, CRC appended here.
pub fn encode_get_version() -> Vec<u8> {
    let mut buf = vec![CMD_GET_VERSION];
    append_crc(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_get_version_frame() {
        let frame = encode_get_version();
        assert_eq!(frame[0], 0x60);
        assert_eq!(frame.len(), 3);
        assert_eq!(
            &frame[1..],
            &crate::protocol::crc::iso14443a_crc(&[0x60])[..]
        );
    }
}
