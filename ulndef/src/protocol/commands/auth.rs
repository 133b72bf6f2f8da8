// ulndef/src/protocol/commands/auth.rs

use crate::constants::CMD_PWD_AUTH;
use crate::protocol::crc::append_crc;
use crate::types::Pwd;

/// Encode an EV1 PWD_AUTH command (0x1B). Raw mode, CRC appended here.
///
/// A successful reply carries the 2-byte PACK.
pub fn encode_pwd_auth(pwd: &Pwd) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5 + 2);
    buf.push(CMD_PWD_AUTH);
    buf.extend_from_slice(pwd.as_bytes());
    append_crc(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_pwd_auth_frame() {
        let pwd = Pwd::from_bytes([0xDE, 0xAD, 0xBE, 0xEF]);
        let frame = encode_pwd_auth(&pwd);
        assert_eq!(frame.len(), 7);
        assert_eq!(&frame[..5], &[0x1B, 0xDE, 0xAD, 0xBE, 0xEF]);
        let crc = crate::protocol::crc::iso14443a_crc(&frame[..5]);
        assert_eq!(&frame[5..], &crc[..]);
    }
}
