// ulndef/src/transport/libnfc.rs

//! libnfc-backed transport built on the `nfc1` crate.
//!
//! The nfc1 `Device` borrows its `Context`, so the transport is created
//! already open from a context owned by the caller (the CLI keeps the
//! context on its stack; dropping it on any exit path releases the reader).

use nfc1::target_info::TargetInfo as NfcTargetInfo;

use crate::transport::traits::Transport;
use crate::types::{Atqa, DeviceInfo, Property, TargetInfo, Uid};
use crate::{Error, Result};

const MAX_TARGETS: usize = 16;

// Largest ISO 14443 frame libnfc hands back.
const MAX_FRAME_LEN: usize = 264;

fn modulation() -> nfc1::Modulation {
    nfc1::Modulation {
        modulation_type: nfc1::ModulationType::Iso14443a,
        baud_rate: nfc1::BaudRate::Baud106,
    }
}

fn map_property(property: Property) -> nfc1::Property {
    match property {
        Property::HandleCrc => nfc1::Property::HandleCrc,
        Property::EasyFraming => nfc1::Property::EasyFraming,
        Property::InfiniteSelect => nfc1::Property::InfiniteSelect,
    }
}

fn map_error(err: nfc1::Error) -> Error {
    match err {
        // RF glitches and timeouts clear after a re-select.
        nfc1::Error::RfTransmissionError
        | nfc1::Error::Timeout
        | nfc1::Error::MifareAuthFailed => Error::IoTransient(err.to_string()),
        _ => Error::IoFatal(err.to_string()),
    }
}

fn convert_target(target: &nfc1::Target) -> Result<TargetInfo> {
    match &target.target_info {
        NfcTargetInfo::Iso14443a(info) => Ok(TargetInfo {
            uid: Uid::from_bytes(&info.uid[..info.uid_len])?,
            atqa: Atqa(info.atqa),
            sak: info.sak,
        }),
        _ => Err(Error::IoFatal("selected target is not ISO 14443-A".into())),
    }
}

/// Transport over one open libnfc reader.
pub struct LibnfcTransport<'ctx> {
    device: nfc1::Device<'ctx>,
    devices: Vec<DeviceInfo>,
    name: String,
}

impl<'ctx> LibnfcTransport<'ctx> {
    /// Open a reader and prepare it as an initiator.
    ///
    /// `connstring` of `None` opens the first reader libnfc finds. The
    /// device list and the reader name are captured up front so
    /// `enumerate_devices` and `name` work after the context borrow moves
    /// into the device. The borrow lifetime is independent of the
    /// context's own parameter so a locally-owned context can still be
    /// dropped at scope end.
    pub fn open_reader<'a>(
        context: &'ctx mut nfc1::Context<'a>,
        connstring: Option<&str>,
    ) -> Result<Self> {
        let devices = Self::probe_devices(context).unwrap_or_default();
        let mut device = match connstring {
            Some(cs) => context.open_with_connstring(cs),
            None => context.open(),
        }
        .map_err(|_| Error::NoDevice)?;
        device.initiator_init().map_err(map_error)?;
        let name = device.name().to_string();
        Ok(Self {
            device,
            devices,
            name,
        })
    }

    /// List readers with their names, opening each briefly (driver names
    /// are only available on an open device).
    pub fn probe_devices(context: &mut nfc1::Context) -> Result<Vec<DeviceInfo>> {
        let connstrings = context.list_devices(MAX_TARGETS).map_err(map_error)?;
        let mut devices = Vec::with_capacity(connstrings.len());
        for connstring in connstrings {
            let name = match context.open_with_connstring(&connstring) {
                Ok(mut device) => device.name().to_string(),
                Err(_) => continue,
            };
            devices.push(DeviceInfo { name, connstring });
        }
        Ok(devices)
    }
}

impl Transport for LibnfcTransport<'_> {
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }

    fn open(&mut self, _connstring: Option<&str>) -> Result<()> {
        // The reader is opened in `open_reader`; nothing left to do.
        Ok(())
    }

    fn close(&mut self) {
        // Dropping the nfc1 device closes the reader.
    }

    fn select_passive_target(&mut self) -> Result<Option<TargetInfo>> {
        match self.device.initiator_select_passive_target(&modulation()) {
            Ok(target) => Ok(Some(convert_target(&target)?)),
            Err(nfc1::Error::Timeout) => Ok(None),
            Err(err) => Err(map_error(err)),
        }
    }

    fn list_targets(&mut self, max: usize) -> Result<Vec<TargetInfo>> {
        let targets = self
            .device
            .initiator_list_passive_targets(&modulation(), max)
            .map_err(map_error)?;
        targets.iter().map(convert_target).collect()
    }

    fn transceive_bytes(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        self.device
            .initiator_transceive_bytes(tx, MAX_FRAME_LEN, nfc1::Timeout::Default)
            .map_err(map_error)
    }

    fn transceive_bits(&mut self, tx: &[u8], tx_bits: usize) -> Result<Vec<u8>> {
        self.device
            .initiator_transceive_bits(tx, tx_bits, MAX_FRAME_LEN)
            .map_err(map_error)
    }

    fn set_property(&mut self, property: Property, value: bool) -> Result<()> {
        self.device
            .set_property_bool(map_property(property), value)
            .map_err(map_error)
    }

    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}
