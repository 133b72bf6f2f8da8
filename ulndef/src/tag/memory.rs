// ulndef/src/tag/memory.rs

//! Page-addressed model of tag memory, sized for the largest supported tag.

use crate::constants::{MAX_PAGES, PAGE_SIZE, USER_AREA_PAGE};
use crate::types::{Pack, Pwd, TagKind};

/// In-memory copy of tag pages. Indexed linearly; pages beyond the
/// classified kind's managed count stay zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    bytes: [u8; MAX_PAGES * PAGE_SIZE],
}

impl Default for Image {
    fn default() -> Self {
        Self {
            bytes: [0u8; MAX_PAGES * PAGE_SIZE],
        }
    }
}

impl Image {
    /// Flat view of the whole image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable flat view of the whole image.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// One page as a 4-byte slice. `page` must be below `MAX_PAGES`.
    pub fn page(&self, page: u32) -> &[u8] {
        let offset = page as usize * PAGE_SIZE;
        &self.bytes[offset..offset + PAGE_SIZE]
    }

    /// Replace one page.
    pub fn set_page(&mut self, page: u32, data: [u8; 4]) {
        let offset = page as usize * PAGE_SIZE;
        self.bytes[offset..offset + PAGE_SIZE].copy_from_slice(&data);
    }

    /// User memory for `kind`: the NDEF TLV area starting at page 4.
    pub fn user_area(&self, kind: TagKind) -> &[u8] {
        let start = USER_AREA_PAGE as usize * PAGE_SIZE;
        &self.bytes[start..start + kind.user_len()]
    }

    /// Mutable user memory for `kind`.
    pub fn user_area_mut(&mut self, kind: TagKind) -> &mut [u8] {
        let start = USER_AREA_PAGE as usize * PAGE_SIZE;
        &mut self.bytes[start..start + kind.user_len()]
    }

    /// Overlay known secrets at the config pages of `kind`.
    ///
    /// EV1 tags never disclose PWD/PACK on wire; merging them after a
    /// successful read keeps the dump restorable.
    pub fn merge_secrets(&mut self, kind: TagKind, pwd: Option<&Pwd>, pack: Option<&Pack>) {
        if let (Some(page), Some(pwd)) = (kind.pwd_page(), pwd) {
            self.set_page(page, *pwd.as_bytes());
        }
        if let (Some(page), Some(pack)) = (kind.pack_page(), pack) {
            let offset = page as usize * PAGE_SIZE;
            self.bytes[offset..offset + 2].copy_from_slice(pack.as_bytes());
        }
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Image {{")?;
        for (page, chunk) in self.bytes.chunks(PAGE_SIZE).enumerate() {
            writeln!(
                f,
                "  {:#04x}: {}",
                page,
                crate::utils::bytes_to_hex(chunk)
            )?;
        }
        write!(f, "}}")
    }
}

/// Result of `read_all`: the image plus per-page accounting.
#[derive(Debug, Clone, Default)]
pub struct Dump {
    /// The assembled memory image; partially-read pages stay zero.
    pub image: Image,
    /// Pages read successfully.
    pub read_pages: u32,
    /// Pages that failed even after re-selection.
    pub failed_pages: u32,
}

impl Dump {
    /// True when every managed page was read.
    pub fn is_complete(&self) -> bool {
        self.failed_pages == 0
    }
}

/// Policy for `write_range`. Everything defaults to off, which skips the
/// UID pages (0-1), the lock page (2) and the OTP page (3).
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Write pages 0-1. Requires a magic card; gated by unlock+verify.
    pub write_uid: bool,
    /// Write the lock-bit page 2.
    pub write_lock: bool,
    /// Write the OTP page 3.
    pub write_otp: bool,
}

/// Per-page accounting for `write_range`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Pages written successfully.
    pub written: u32,
    /// Pages skipped by policy.
    pub skipped: u32,
    /// Pages that failed even after re-selection.
    pub failed: u32,
}
