// ulndef/src/actions.rs

//! End-to-end drivers for the three CLI actions: list, read, write.

use crate::ndef;
use crate::tag::memory::{Image, WriteOptions};
use crate::tag::{operations, Session};
use crate::transport::Transport;
use crate::types::{DeviceInfo, Pwd};
use crate::{Error, Result};

/// What a read (or a verified write) reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    /// UID of the tag as lowercase hex.
    pub chip_uuid: String,
    /// Decoded URI.
    pub url: String,
}

/// Enumerate the readers the transport driver knows about.
pub fn list_devices(transport: &mut dyn Transport) -> Result<Vec<DeviceInfo>> {
    transport.enumerate_devices()
}

/// Bring a fresh session up to the point where page operations are legal:
/// select the tag, classify it, and authenticate when a password is given.
pub fn attach(session: &mut Session<'_>, pwd: Option<Pwd>) -> Result<()> {
    session.select()?;
    session.classify()?;
    if let Some(pwd) = pwd {
        session.auth(pwd)?;
    }
    Ok(())
}

/// Read the whole tag and decode the URI record.
///
/// An incomplete dump is an error even though partial bytes were kept; a
/// URL decoded from holes would be garbage.
pub fn read_tag(session: &mut Session<'_>) -> Result<TagReport> {
    let dump = operations::read_all(session)?;
    if !dump.is_complete() {
        return Err(Error::IoFatal(format!(
            "{} of {} pages failed to read",
            dump.failed_pages,
            session.managed_pages()
        )));
    }
    let url = ndef::decode(&dump.image, session.kind())?;
    Ok(TagReport {
        chip_uuid: session.uid_hex(),
        url,
    })
}

/// Encode `url` into a fresh image, write the user area, then run the full
/// read-verification cycle. The returned report is the verification read;
/// JSON consumers depend on the write response being what the tag now
/// actually holds.
pub fn write_tag(session: &mut Session<'_>, url: &str) -> Result<TagReport> {
    let mut image = Image::default();
    ndef::encode(url, &mut image, session.kind())?;

    let stats = operations::write_range(session, &image, &WriteOptions::default())?;
    if stats.failed > 0 {
        return Err(Error::IoFatal(format!(
            "{} of {} pages failed to write",
            stats.failed,
            session.managed_pages()
        )));
    }

    read_tag(session)
}
