// ulndef/src/types.rs

use crate::constants::{ATQA_MIFARE, PAGE_SIZE, STORAGE_UL11, STORAGE_UL21};
use crate::Error;
use std::convert::TryFrom;

/// Tag UID - Newtype Pattern (up to 10 bytes on ISO 14443-A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid {
    bytes: [u8; 10],
    len: usize,
}

impl Uid {
    /// Wrap the UID bytes reported by anti-collision.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.is_empty() || bytes.len() > 10 {
            return Err(Error::InvalidLength {
                expected: 10,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 10];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: arr,
            len: bytes.len(),
        })
    }

    /// UID bytes, trimmed to the reported length.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Lowercase hex rendition, the `chip_uuid` of the JSON envelope.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

/// ATQA - answer to request, as stored by the reader (byte order as received)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atqa(pub [u8; 2]);

impl Atqa {
    /// MIFARE Ultralight family answers with 0x44 in the second byte.
    pub fn is_mifare(&self) -> bool {
        self.0[1] == ATQA_MIFARE
    }

    /// Big-endian numeric view, used for diagnostics.
    pub fn as_u16(&self) -> u16 {
        u16::from_be_bytes(self.0)
    }
}

/// Result of a successful anti-collision select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    /// Tag UID exchanged during anti-collision.
    pub uid: Uid,
    /// Answer to request bytes.
    pub atqa: Atqa,
    /// Select acknowledge byte.
    pub sak: u8,
}

/// A reader known to the transport driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Human-readable reader name.
    pub name: String,
    /// Driver connection string used to open the reader.
    pub connstring: String,
}

/// EV1 password - Newtype Pattern (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pwd([u8; 4]);

impl Pwd {
    /// Wrap raw password bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Parse the CLI form: exactly 8 hex digits.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes =
            crate::utils::parse_hex(s).map_err(|_| Error::InvalidPassword(s.to_string()))?;
        if bytes.len() != 4 {
            return Err(Error::InvalidPassword(s.to_string()));
        }
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Password bytes in wire order.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

/// EV1 password acknowledge - Newtype Pattern (2 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pack([u8; 2]);

impl Pack {
    /// Wrap the 2-byte acknowledge returned by PWD_AUTH.
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// Acknowledge bytes in wire order.
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

/// Tag kind derived from the GET_VERSION storage byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Plain MIFARE Ultralight, no GET_VERSION support.
    Ultralight,
    /// Ultralight EV1 MF0UL11, 48 bytes of user memory.
    Ul11,
    /// Ultralight EV1 MF0UL21, 128 bytes of user memory.
    Ul21,
}

impl TagKind {
    /// Map GET_VERSION reply byte 6 to a kind; unknown bytes yield None.
    pub fn from_storage_byte(byte: u8) -> Option<Self> {
        match byte {
            STORAGE_UL11 => Some(Self::Ul11),
            STORAGE_UL21 => Some(Self::Ul21),
            _ => None,
        }
    }

    /// Pages managed by dump and restore for this kind.
    pub fn managed_pages(&self) -> u32 {
        match self {
            Self::Ultralight => 0x10,
            Self::Ul11 => 0x14,
            Self::Ul21 => 0x29,
        }
    }

    /// Bytes of user memory available for the NDEF TLV area.
    pub fn user_len(&self) -> usize {
        match self {
            Self::Ultralight | Self::Ul11 => 48,
            Self::Ul21 => 128,
        }
    }

    /// EV1 kinds answer GET_VERSION and support PWD_AUTH.
    pub fn is_ev1(&self) -> bool {
        !matches!(self, Self::Ultralight)
    }

    /// Page holding the PWD overlay, where the kind has one.
    pub fn pwd_page(&self) -> Option<u32> {
        match self {
            Self::Ultralight => None,
            Self::Ul11 => Some(18),
            Self::Ul21 => Some(37),
        }
    }

    /// Page whose low half holds the PACK overlay.
    pub fn pack_page(&self) -> Option<u32> {
        match self {
            Self::Ultralight => None,
            Self::Ul11 => Some(19),
            Self::Ul21 => Some(38),
        }
    }

    /// Total managed bytes, the valid prefix of a memory image.
    pub fn managed_len(&self) -> usize {
        self.managed_pages() as usize * PAGE_SIZE
    }
}

impl Default for TagKind {
    fn default() -> Self {
        // Until GET_VERSION says otherwise, assume the smallest memory map.
        TagKind::Ultralight
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ultralight => write!(f, "MIFARE Ultralight"),
            Self::Ul11 => write!(f, "MIFARE Ultralight EV1 (MF0UL11)"),
            Self::Ul21 => write!(f, "MIFARE Ultralight EV1 (MF0UL21)"),
        }
    }
}

/// Boolean reader properties toggled through the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Reader appends and checks the ISO 14443-A CRC itself.
    HandleCrc,
    /// Reader wraps tag commands in its own framing.
    EasyFraming,
    /// Reader retries anti-collision forever instead of returning.
    InfiniteSelect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_from_bytes_ok() {
        let uid = Uid::from_bytes(&[0x04, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6]).unwrap();
        assert_eq!(uid.as_bytes().len(), 7);
        assert_eq!(uid.to_hex(), "04a1b2c3d4e5f6");
    }

    #[test]
    fn uid_from_bytes_err() {
        assert!(Uid::from_bytes(&[]).is_err());
        assert!(Uid::from_bytes(&[0u8; 11]).is_err());
    }

    #[test]
    fn atqa_mifare_check() {
        assert!(Atqa([0x00, 0x44]).is_mifare());
        assert!(!Atqa([0x00, 0x04]).is_mifare());
        assert_eq!(Atqa([0x00, 0x44]).as_u16(), 0x0044);
    }

    #[test]
    fn pwd_from_hex() {
        let pwd = Pwd::from_hex("0011aaFF").unwrap();
        assert_eq!(pwd.as_bytes(), &[0x00, 0x11, 0xAA, 0xFF]);

        assert!(Pwd::from_hex("0011aa").is_err());
        assert!(Pwd::from_hex("0011aaZZ").is_err());
    }

    #[test]
    fn tag_kind_from_storage_byte() {
        assert_eq!(TagKind::from_storage_byte(0x0B), Some(TagKind::Ul11));
        assert_eq!(TagKind::from_storage_byte(0x0E), Some(TagKind::Ul21));
        assert_eq!(TagKind::from_storage_byte(0x00), None);
    }

    #[test]
    fn tag_kind_geometry() {
        assert_eq!(TagKind::Ultralight.managed_pages(), 0x10);
        assert_eq!(TagKind::Ul11.managed_pages(), 0x14);
        assert_eq!(TagKind::Ul21.managed_pages(), 0x29);

        assert_eq!(TagKind::Ultralight.user_len(), 48);
        assert_eq!(TagKind::Ul11.user_len(), 48);
        assert_eq!(TagKind::Ul21.user_len(), 128);
    }

    #[test]
    fn tag_kind_overlays() {
        assert_eq!(TagKind::Ul11.pwd_page(), Some(18));
        assert_eq!(TagKind::Ul11.pack_page(), Some(19));
        assert_eq!(TagKind::Ul21.pwd_page(), Some(37));
        assert_eq!(TagKind::Ul21.pack_page(), Some(38));
        assert_eq!(TagKind::Ultralight.pwd_page(), None);
    }
}
