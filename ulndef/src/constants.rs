// ulndef/src/constants.rs
//! Wire-level constants shared across the crate

/// MIFARE Ultralight READ command code (framed mode, returns four pages).
pub const CMD_READ: u8 = 0x30;

/// MIFARE compatibility WRITE command code (framed mode, 16-byte payload).
pub const CMD_COMPAT_WRITE: u8 = 0xA0;

/// Ultralight EV1 GET_VERSION command code (raw mode).
pub const CMD_GET_VERSION: u8 = 0x60;

/// Ultralight EV1 PWD_AUTH command code (raw mode).
pub const CMD_PWD_AUTH: u8 = 0x1B;

/// ISO 14443-3 HLTA command (raw mode).
pub const CMD_HALT: [u8; 2] = [0x50, 0x00];

/// First magic-card unlock frame, sent as 7 bits.
pub const MAGIC_UNLOCK_1: u8 = 0x40;

/// Second magic-card unlock frame, sent as a full byte.
pub const MAGIC_UNLOCK_2: u8 = 0x43;

/// Bytes per tag page.
pub const PAGE_SIZE: usize = 4;

/// Pages returned by a single READ command.
pub const READ_PAGES: u32 = 4;

/// Managed page count of the largest supported tag kind (UL21).
pub const MAX_PAGES: usize = 0x29;

/// First page of the user memory area holding the NDEF TLV.
pub const USER_AREA_PAGE: u32 = 4;

/// ATQA second byte identifying the MIFARE Ultralight family.
pub const ATQA_MIFARE: u8 = 0x44;

/// Index of the storage-size byte in a GET_VERSION reply.
pub const VERSION_STORAGE_INDEX: usize = 6;

/// GET_VERSION storage byte for a UL11 (48 bytes of user memory).
pub const STORAGE_UL11: u8 = 0x0B;

/// GET_VERSION storage byte for a UL21 (128 bytes of user memory).
pub const STORAGE_UL21: u8 = 0x0E;

/// NDEF message TLV tag.
pub const TLV_NDEF: u8 = 0x03;

/// TLV terminator tag.
pub const TLV_TERMINATOR: u8 = 0xFE;

/// NDEF header for a single short well-known record (MB, ME, SR, TNF=1).
pub const NDEF_SINGLE_SHORT_RECORD: u8 = 0xD1;

/// NDEF well-known type byte for a URI record ('U').
pub const NDEF_TYPE_URI: u8 = 0x55;
