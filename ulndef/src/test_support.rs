// ulndef/src/test_support.rs

//! Test support: a behavioural reader+tag simulation driving the real wire
//! protocol, shared by unit tests and the scenario tests in `tests/`.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::{
    CMD_COMPAT_WRITE, CMD_GET_VERSION, CMD_HALT, CMD_PWD_AUTH, CMD_READ, MAGIC_UNLOCK_1,
    MAGIC_UNLOCK_2, MAX_PAGES, PAGE_SIZE, STORAGE_UL11, STORAGE_UL21,
};
use crate::protocol::crc::iso14443a_crc;
use crate::transport::traits::Transport;
use crate::types::{Atqa, DeviceInfo, Property, TargetInfo, Uid};
use crate::{Error, Result};

/// Simulated reader with a single Ultralight/EV1 tag in its field.
///
/// Framed commands are interpreted against an in-memory page array; raw
/// commands must carry a valid ISO 14443-A CRC (except the one-byte magic
/// unlock frame, which is CRC-less on real hardware too). Framing state is
/// tracked so tests catch leaked raw windows.
#[derive(Debug, Clone)]
pub struct SimTag {
    /// Tag memory, sized for the largest kind.
    pub pages: [u8; MAX_PAGES * PAGE_SIZE],
    /// GET_VERSION storage byte; `None` simulates a plain Ultralight that
    /// treats GET_VERSION as an invalid command and deselects.
    pub storage_byte: Option<u8>,
    /// Tag UID reported by anti-collision.
    pub uid: [u8; 7],
    /// ATQA reported by anti-collision.
    pub atqa: [u8; 2],
    /// Whether a tag is in the field at all.
    pub present: bool,
    /// Clone card accepting the unlock sequence.
    pub magic: bool,
    /// Unlock sequence completed; UID pages writable.
    pub unlocked: bool,
    /// EV1 password, when the simulated tag has one set.
    pub pwd: Option<[u8; 4]>,
    /// PACK returned on successful auth.
    pub pack: [u8; 2],
    /// Readers reported by `enumerate_devices`.
    pub devices: Vec<DeviceInfo>,
    /// Pages whose next READ fails once (transient), then succeeds.
    pub fail_read_pages: Vec<u32>,
    /// Pages whose next WRITE fails once (transient), then succeeds.
    pub fail_write_pages: Vec<u32>,
    /// Reader CRC handling state.
    pub handle_crc: bool,
    /// Reader easy-framing state.
    pub easy_framing: bool,
    /// Reader infinite-select state.
    pub infinite_select: bool,
    /// Number of anti-collision selects performed.
    pub select_count: u32,
    selected: bool,
    halted: bool,
    unlock_step1: bool,
}

impl SimTag {
    fn base(storage_byte: Option<u8>) -> Self {
        Self {
            pages: [0u8; MAX_PAGES * PAGE_SIZE],
            storage_byte,
            uid: [0x04, 0x1D, 0x2E, 0x3F, 0x4A, 0x5B, 0x6C],
            atqa: [0x00, 0x44],
            present: true,
            magic: false,
            unlocked: false,
            pwd: None,
            pack: [0x00, 0x00],
            devices: Vec::new(),
            fail_read_pages: Vec::new(),
            fail_write_pages: Vec::new(),
            handle_crc: true,
            easy_framing: true,
            infinite_select: true,
            select_count: 0,
            selected: false,
            halted: false,
            unlock_step1: false,
        }
    }

    /// Plain Ultralight, 0x10 managed pages, no GET_VERSION support.
    pub fn plain() -> Self {
        Self::base(None)
    }

    /// Ultralight EV1 MF0UL11.
    pub fn ul11() -> Self {
        Self::base(Some(STORAGE_UL11))
    }

    /// Ultralight EV1 MF0UL21.
    pub fn ul21() -> Self {
        Self::base(Some(STORAGE_UL21))
    }

    /// Empty reader field.
    pub fn absent(mut self) -> Self {
        self.present = false;
        self
    }

    /// Make the tag a magic clone card.
    pub fn magic(mut self) -> Self {
        self.magic = true;
        self
    }

    /// Protect the tag with an EV1 password.
    pub fn with_pwd(mut self, pwd: [u8; 4], pack: [u8; 2]) -> Self {
        self.pwd = Some(pwd);
        self.pack = pack;
        self
    }

    /// Pre-load the user area (byte offset 16) with `bytes`.
    pub fn with_user_bytes(mut self, bytes: &[u8]) -> Self {
        self.pages[16..16 + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Fail the next READ touching `page` once.
    pub fn fail_read_at(mut self, page: u32) -> Self {
        self.fail_read_pages.push(page);
        self
    }

    /// UID as lowercase hex, for envelope assertions.
    pub fn uid_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.uid)
    }

    fn target_info(&self) -> Result<TargetInfo> {
        Ok(TargetInfo {
            uid: Uid::from_bytes(&self.uid)?,
            atqa: Atqa(self.atqa),
            sak: 0x00,
        })
    }

    fn framed(&self) -> bool {
        self.handle_crc && self.easy_framing
    }

    fn raw(&self) -> bool {
        !self.handle_crc && !self.easy_framing
    }

    fn framed_command(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        if !self.selected {
            return Err(Error::IoTransient("no target selected".into()));
        }
        match tx.first().copied() {
            Some(CMD_READ) if tx.len() == 2 => {
                let page = tx[1] as u32;
                if let Some(pos) = self.fail_read_pages.iter().position(|&p| p == page) {
                    self.fail_read_pages.remove(pos);
                    self.selected = false;
                    return Err(Error::IoTransient("rf glitch".into()));
                }
                let mut reply = vec![0u8; 16];
                let offset = page as usize * PAGE_SIZE;
                for (i, byte) in reply.iter_mut().enumerate() {
                    *byte = self.pages.get(offset + i).copied().unwrap_or(0);
                }
                Ok(reply)
            }
            Some(CMD_COMPAT_WRITE) if tx.len() == 18 => {
                let page = tx[1] as u32;
                if let Some(pos) = self.fail_write_pages.iter().position(|&p| p == page) {
                    self.fail_write_pages.remove(pos);
                    self.selected = false;
                    return Err(Error::IoTransient("rf glitch".into()));
                }
                if page <= 1 && !self.unlocked {
                    self.selected = false;
                    return Err(Error::IoTransient("write to UID page rejected".into()));
                }
                let offset = page as usize * PAGE_SIZE;
                if offset + PAGE_SIZE > self.pages.len() {
                    self.selected = false;
                    return Err(Error::IoTransient("page out of range".into()));
                }
                self.pages[offset..offset + PAGE_SIZE].copy_from_slice(&tx[2..2 + PAGE_SIZE]);
                Ok(vec![0x0A])
            }
            _ => {
                self.selected = false;
                Err(Error::IoTransient("unknown framed command".into()))
            }
        }
    }

    fn raw_command(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        // The second magic unlock frame is a bare byte without CRC.
        if tx == [MAGIC_UNLOCK_2] {
            if self.magic && self.unlock_step1 {
                self.unlocked = true;
                self.halted = false;
                self.selected = true;
                return Ok(vec![0x0A]);
            }
            return Err(Error::IoTransient("unlock rejected".into()));
        }

        if tx.len() < 3 {
            return Err(Error::IoFatal("raw frame too short".into()));
        }
        let (body, crc) = tx.split_at(tx.len() - 2);
        if iso14443a_crc(body) != [crc[0], crc[1]] {
            return Err(Error::IoFatal("raw frame with bad CRC".into()));
        }

        match body.first().copied() {
            Some(CMD_GET_VERSION) if body.len() == 1 => match self.storage_byte {
                Some(storage) => Ok(vec![0x00, 0x04, 0x04, 0x02, 0x01, 0x00, storage, 0x03]),
                None => {
                    // Invalid command for a plain Ultralight; the tag
                    // drops out of the ACTIVE state.
                    self.selected = false;
                    Err(Error::IoTransient("no reply to GET_VERSION".into()))
                }
            },
            Some(CMD_PWD_AUTH) if body.len() == 5 => {
                if self.pwd.as_ref().map(|p| &p[..]) == Some(&body[1..5]) {
                    Ok(self.pack.to_vec())
                } else {
                    self.selected = false;
                    Err(Error::IoTransient("PWD_AUTH rejected".into()))
                }
            }
            Some(b) if b == CMD_HALT[0] && body == CMD_HALT => {
                self.halted = true;
                self.selected = false;
                Err(Error::IoTransient("tag halted".into()))
            }
            _ => {
                self.selected = false;
                Err(Error::IoTransient("unknown raw command".into()))
            }
        }
    }
}

impl Transport for SimTag {
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }

    fn open(&mut self, _connstring: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {}

    fn select_passive_target(&mut self) -> Result<Option<TargetInfo>> {
        self.select_count += 1;
        if !self.present {
            return Ok(None);
        }
        self.selected = true;
        self.halted = false;
        Ok(Some(self.target_info()?))
    }

    fn list_targets(&mut self, _max: usize) -> Result<Vec<TargetInfo>> {
        if !self.present {
            return Ok(Vec::new());
        }
        Ok(vec![self.target_info()?])
    }

    fn transceive_bytes(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        if !self.present {
            return Err(Error::IoTransient("no tag in field".into()));
        }
        if self.framed() {
            self.framed_command(tx)
        } else if self.raw() {
            self.raw_command(tx)
        } else {
            Err(Error::IoFatal("inconsistent framing state".into()))
        }
    }

    fn transceive_bits(&mut self, tx: &[u8], tx_bits: usize) -> Result<Vec<u8>> {
        if !self.raw() {
            return Err(Error::IoFatal("bit frame outside raw mode".into()));
        }
        if tx == [MAGIC_UNLOCK_1] && tx_bits == 7 && self.magic && self.halted {
            self.unlock_step1 = true;
            return Ok(vec![0x0A]);
        }
        Err(Error::IoTransient("bit frame rejected".into()))
    }

    fn set_property(&mut self, property: Property, value: bool) -> Result<()> {
        match property {
            Property::HandleCrc => self.handle_crc = value,
            Property::EasyFraming => self.easy_framing = value,
            Property::InfiniteSelect => self.infinite_select = value,
        }
        Ok(())
    }

    fn name(&self) -> Option<String> {
        Some("simulated reader".to_string())
    }
}

/// Transport wrapper sharing a `SimTag` with the test body, so state can
/// be inspected after the session takes ownership of the transport.
pub struct SharedSim {
    inner: Rc<RefCell<SimTag>>,
}

impl SharedSim {
    /// Wrap `sim`; the returned handle reads the same state the session
    /// mutates.
    pub fn new(sim: SimTag) -> (Self, Rc<RefCell<SimTag>>) {
        let inner = Rc::new(RefCell::new(sim));
        (
            Self {
                inner: Rc::clone(&inner),
            },
            inner,
        )
    }
}

impl Transport for SharedSim {
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>> {
        self.inner.borrow_mut().enumerate_devices()
    }

    fn open(&mut self, connstring: Option<&str>) -> Result<()> {
        self.inner.borrow_mut().open(connstring)
    }

    fn close(&mut self) {
        self.inner.borrow_mut().close()
    }

    fn select_passive_target(&mut self) -> Result<Option<TargetInfo>> {
        self.inner.borrow_mut().select_passive_target()
    }

    fn list_targets(&mut self, max: usize) -> Result<Vec<TargetInfo>> {
        self.inner.borrow_mut().list_targets(max)
    }

    fn transceive_bytes(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        self.inner.borrow_mut().transceive_bytes(tx)
    }

    fn transceive_bits(&mut self, tx: &[u8], tx_bits: usize) -> Result<Vec<u8>> {
        self.inner.borrow_mut().transceive_bits(tx, tx_bits)
    }

    fn set_property(&mut self, property: Property, value: bool) -> Result<()> {
        self.inner.borrow_mut().set_property(property, value)
    }

    fn name(&self) -> Option<String> {
        self.inner.borrow().name()
    }
}
