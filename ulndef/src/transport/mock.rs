// ulndef/src/transport/mock.rs

use std::collections::VecDeque;

use crate::transport::traits::Transport;
use crate::types::{Atqa, DeviceInfo, Property, TargetInfo, Uid};
use crate::{Error, Result};

/// Scripted reply for a queued transceive.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return these bytes.
    Reply(Vec<u8>),
    /// Fail with `Error::IoTransient`.
    Transient,
    /// Fail with `Error::IoFatal`.
    Fatal,
}

/// Mock transport for unit tests. It records sent frames and property
/// toggles and returns queued replies in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Byte frames sent through `transceive_bytes`.
    pub sent: Vec<Vec<u8>>,
    /// Bit frames sent through `transceive_bits`, with their bit length.
    pub sent_bits: Vec<(Vec<u8>, usize)>,
    /// Scripted replies consumed front to back by both transceivers.
    pub replies: VecDeque<Scripted>,
    /// Targets returned by successive `select_passive_target` calls.
    pub targets: VecDeque<Option<TargetInfo>>,
    /// Devices reported by `enumerate_devices`.
    pub devices: Vec<DeviceInfo>,
    /// Log of `set_property` calls, in order.
    pub property_log: Vec<(Property, bool)>,
    /// Current reader CRC handling state.
    pub handle_crc: bool,
    /// Current reader easy-framing state.
    pub easy_framing: bool,
    /// Current infinite-select state.
    pub infinite_select: bool,
    /// Whether `open` has been called.
    pub opened: bool,
}

impl MockTransport {
    /// Fresh mock with reader defaults: CRC and easy framing on.
    pub fn new() -> Self {
        Self {
            handle_crc: true,
            easy_framing: true,
            infinite_select: true,
            ..Self::default()
        }
    }

    /// Queue a successful reply.
    pub fn push_reply(&mut self, reply: Vec<u8>) {
        self.replies.push_back(Scripted::Reply(reply));
    }

    /// Queue a transient failure.
    pub fn push_transient(&mut self) {
        self.replies.push_back(Scripted::Transient);
    }

    /// Queue a target for the next `select_passive_target` call.
    pub fn push_target(&mut self, target: Option<TargetInfo>) {
        self.targets.push_back(target);
    }

    /// A plausible Ultralight target for tests.
    pub fn sample_target() -> TargetInfo {
        TargetInfo {
            uid: Uid::from_bytes(&[0x04, 0x1D, 0x2E, 0x3F, 0x4A, 0x5B, 0x6C])
                .expect("static UID is valid"),
            atqa: Atqa([0x00, 0x44]),
            sak: 0x00,
        }
    }

    fn next_reply(&mut self) -> Result<Vec<u8>> {
        match self.replies.pop_front() {
            Some(Scripted::Reply(bytes)) => Ok(bytes),
            Some(Scripted::Transient) => Err(Error::IoTransient("scripted failure".into())),
            Some(Scripted::Fatal) => Err(Error::IoFatal("scripted failure".into())),
            None => Err(Error::IoTransient("no scripted reply".into())),
        }
    }
}

impl Transport for MockTransport {
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }

    fn open(&mut self, _connstring: Option<&str>) -> Result<()> {
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) {
        self.opened = false;
    }

    fn select_passive_target(&mut self) -> Result<Option<TargetInfo>> {
        // An empty queue means no tag in the field.
        Ok(self.targets.pop_front().flatten())
    }

    fn list_targets(&mut self, max: usize) -> Result<Vec<TargetInfo>> {
        Ok(self
            .targets
            .iter()
            .flatten()
            .take(max)
            .cloned()
            .collect())
    }

    fn transceive_bytes(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        self.sent.push(tx.to_vec());
        self.next_reply()
    }

    fn transceive_bits(&mut self, tx: &[u8], tx_bits: usize) -> Result<Vec<u8>> {
        self.sent_bits.push((tx.to_vec(), tx_bits));
        self.next_reply()
    }

    fn set_property(&mut self, property: Property, value: bool) -> Result<()> {
        self.property_log.push((property, value));
        match property {
            Property::HandleCrc => self.handle_crc = value,
            Property::EasyFraming => self.easy_framing = value,
            Property::InfiniteSelect => self.infinite_select = value,
        }
        Ok(())
    }

    fn name(&self) -> Option<String> {
        Some("mock reader".to_string())
    }
}
