// ulndef/src/tag/mod.rs

use crate::constants::VERSION_STORAGE_INDEX;
use crate::protocol::commands::Command;
use crate::transport::Transport;
use crate::types::{Pack, Property, Pwd, TagKind, TargetInfo};
use crate::{Error, Result};

pub mod memory;
pub mod operations;

pub use memory::{Dump, Image, WriteOptions, WriteStats};

/// One reader/tag conversation, owned for the duration of one invocation.
///
/// State machine: `open` -> `select` -> `classify` -> optional `auth` ->
/// page operations. Any failed transceive clears `selected`; the next
/// `ensure_selected` re-runs anti-collision or ends the session with
/// `TagRemoved`.
pub struct Session<'t> {
    transport: Box<dyn Transport + 't>,
    target: Option<TargetInfo>,
    kind: TagKind,
    pwd: Option<Pwd>,
    pack: Option<Pack>,
    selected: bool,
}

impl<'t> Session<'t> {
    /// Open the reader behind `transport` and disable infinite select so
    /// that selection returns promptly when no tag is present.
    pub fn open(mut transport: Box<dyn Transport + 't>, connstring: Option<&str>) -> Result<Self> {
        transport.open(connstring).map_err(|_| Error::NoDevice)?;
        transport.set_property(Property::InfiniteSelect, false)?;
        if let Some(name) = transport.name() {
            log::info!("NFC device {} opened", name);
        }
        Ok(Self {
            transport,
            target: None,
            kind: TagKind::default(),
            pwd: None,
            pack: None,
            selected: false,
        })
    }

    /// Select one tag in the field and check it is a MIFARE Ultralight.
    pub fn select(&mut self) -> Result<()> {
        let target = self.transport.select_passive_target()?.ok_or(Error::NoTag)?;
        if !target.atqa.is_mifare() {
            return Err(Error::WrongTagType {
                atqa: target.atqa.as_u16(),
            });
        }
        log::info!("using MIFARE Ultralight card with UID {}", target.uid.to_hex());
        self.target = Some(target);
        self.selected = true;
        Ok(())
    }

    /// Send GET_VERSION in a raw window and derive the tag kind.
    ///
    /// A plain Ultralight treats GET_VERSION as an invalid command and
    /// drops out of the ACTIVE state, so the no-reply path re-selects the
    /// tag before returning. The kind is fixed for the rest of the session.
    pub fn classify(&mut self) -> Result<TagKind> {
        let reply = self.command(&Command::GetVersion);
        match reply {
            Ok(bytes) if bytes.len() > VERSION_STORAGE_INDEX => {
                self.kind = TagKind::from_storage_byte(bytes[VERSION_STORAGE_INDEX])
                    .unwrap_or(TagKind::Ultralight);
            }
            Ok(_) | Err(Error::IoTransient(_)) => {
                self.kind = TagKind::Ultralight;
                self.selected = false;
                self.ensure_selected()?;
            }
            Err(err) => return Err(err),
        }
        log::debug!(
            "classified as {} ({:#04x} managed pages)",
            self.kind,
            self.managed_pages()
        );
        Ok(self.kind)
    }

    /// Authenticate with the EV1 password; a success stores the PACK.
    ///
    /// Failure is fatal for the invocation: the tag silently deselects a
    /// wrong password and nothing later in the session can be trusted.
    pub fn auth(&mut self, pwd: Pwd) -> Result<Pack> {
        let reply = self
            .command(&Command::PwdAuth { pwd })
            .map_err(|_| Error::AuthFailed)?;
        if reply.len() < 2 {
            return Err(Error::AuthFailed);
        }
        let pack = Pack::from_bytes([reply[0], reply[1]]);
        log::info!("PWD_AUTH accepted, PACK {:02x}{:02x}", reply[0], reply[1]);
        self.pwd = Some(pwd);
        self.pack = Some(pack);
        Ok(pack)
    }

    /// Re-run anti-collision after a failed transceive. Zero targets means
    /// the tag left the field; the session is then terminal.
    pub fn ensure_selected(&mut self) -> Result<()> {
        if self.selected {
            return Ok(());
        }
        match self.transport.select_passive_target() {
            Ok(Some(target)) => {
                self.target = Some(target);
                self.selected = true;
                Ok(())
            }
            Ok(None) | Err(_) => Err(Error::TagRemoved),
        }
    }

    /// Read four pages starting at `page` (framed mode).
    pub fn read_pages(&mut self, page: u32) -> Result<Vec<u8>> {
        self.command(&Command::Read { page })
    }

    /// Write one page (framed compatibility mode).
    pub fn write_page(&mut self, page: u32, data: [u8; 4]) -> Result<()> {
        self.command(&Command::CompatWrite { page, data })?;
        Ok(())
    }

    /// Send one tag command: framed commands go straight through, raw
    /// commands run inside a scoped raw window.
    pub(crate) fn command(&mut self, command: &Command) -> Result<Vec<u8>> {
        log::trace!("tag command {:#04x}", command.command_code());
        if command.is_raw() {
            self.raw_frames(|t| t.transceive_bytes(&command.encode()))
        } else {
            self.transceive(&command.encode())
        }
    }

    /// Framed transceive that tracks selection state.
    pub(crate) fn transceive(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        match self.transport.transceive_bytes(tx) {
            Ok(reply) => Ok(reply),
            Err(err) => {
                self.selected = false;
                Err(err)
            }
        }
    }

    /// Run `f` with reader CRC handling and easy framing off, restoring
    /// both on every exit path. A leaked raw window makes every later
    /// framed command fail silently.
    pub(crate) fn raw_frames<R>(
        &mut self,
        f: impl FnOnce(&mut dyn Transport) -> Result<R>,
    ) -> Result<R> {
        self.transport.set_property(Property::HandleCrc, false)?;
        if let Err(err) = self.transport.set_property(Property::EasyFraming, false) {
            let _ = self.transport.set_property(Property::HandleCrc, true);
            return Err(err);
        }

        let outcome = f(self.transport.as_mut());

        let crc_restored = self.transport.set_property(Property::HandleCrc, true);
        let framing_restored = self.transport.set_property(Property::EasyFraming, true);

        if outcome.is_err() {
            self.selected = false;
        }
        let value = outcome?;
        crc_restored?;
        framing_restored?;
        Ok(value)
    }

    /// The selected target, if any.
    pub fn target(&self) -> Option<&TargetInfo> {
        self.target.as_ref()
    }

    /// UID of the selected target as lowercase hex, or empty.
    pub fn uid_hex(&self) -> String {
        self.target
            .as_ref()
            .map(|t| t.uid.to_hex())
            .unwrap_or_default()
    }

    /// Tag kind fixed by `classify`.
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// Managed page count for the classified kind. Never decreases.
    pub fn managed_pages(&self) -> u32 {
        self.kind.managed_pages()
    }

    /// Password supplied to a successful `auth`, if any.
    pub fn pwd(&self) -> Option<&Pwd> {
        self.pwd.as_ref()
    }

    /// PACK returned by a successful `auth` in this session, if any.
    pub fn pack(&self) -> Option<&Pack> {
        self.pack.as_ref()
    }

    /// Copy known secrets into the dump image at the overlay pages for the
    /// classified kind. The card never discloses PWD/PACK on wire.
    pub fn merge_secrets(&self, image: &mut memory::Image) {
        image.merge_secrets(self.kind, self.pwd.as_ref(), self.pack.as_ref());
    }

    /// Consume the session, closing the reader.
    pub fn close(mut self) {
        self.transport.close();
    }

    #[cfg(test)]
    pub(crate) fn selected_for_test(&self) -> bool {
        self.selected
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("selected", &self.selected)
            .finish()
    }
}
