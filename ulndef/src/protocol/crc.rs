// ulndef/src/protocol/crc.rs

/// Compute the ISO 14443-A CRC-16 of `data`.
///
/// Polynomial 0x8408, initial value 0x6363. The result is returned in wire
/// order, low byte first, ready to append to a raw frame.
pub fn iso14443a_crc(data: &[u8]) -> [u8; 2] {
    let mut w: u32 = 0x6363;
    for &byte in data {
        let mut b = byte ^ (w & 0xFF) as u8;
        b ^= b << 4;
        w = (w >> 8) ^ ((b as u32) << 8) ^ ((b as u32) << 3) ^ ((b as u32) >> 4);
        w &= 0xFFFF;
    }
    [(w & 0xFF) as u8, (w >> 8) as u8]
}

/// Append the ISO 14443-A CRC to a raw frame in place.
pub fn append_crc(frame: &mut Vec<u8>) {
    let crc = iso14443a_crc(frame);
    frame.extend_from_slice(&crc);
}
