// ulndef/src/tag/operations/unlock.rs

use crate::constants::{MAGIC_UNLOCK_1, MAGIC_UNLOCK_2, PAGE_SIZE};
use crate::protocol::commands::Command;
use crate::tag::memory::Image;
use crate::tag::Session;
use crate::{Error, Result};

/// Send the magic-card unlock sequence: HLTA, a 7-bit 0x40 frame, then a
/// 0x43 byte frame, all inside one raw window.
///
/// The HLTA reply is ignored; a halted tag never answers. Success means
/// both unlock frames completed without a transport error, which is not
/// proof the card unlocked; callers verify with a page-0 readback.
pub fn magic_unlock(session: &mut Session<'_>) -> Result<()> {
    session.raw_frames(|t| {
        let _ = t.transceive_bytes(&Command::Halt.encode());
        t.transceive_bits(&[MAGIC_UNLOCK_1], 7)?;
        t.transceive_bytes(&[MAGIC_UNLOCK_2])?;
        Ok(())
    })
}

/// Unlock the card and prove it took: write page 0 from the image, read it
/// back, and require an exact match. Anything else is `NotMagic`.
pub(crate) fn unlock_for_uid_write(session: &mut Session<'_>, image: &Image) -> Result<()> {
    magic_unlock(session).map_err(|_| Error::NotMagic)?;

    let mut expected = [0u8; 4];
    expected.copy_from_slice(image.page(0));
    session
        .write_page(0, expected)
        .map_err(|_| Error::NotMagic)?;

    let reply = session.read_pages(0).map_err(|_| Error::NotMagic)?;
    if reply.len() < PAGE_SIZE || reply[..PAGE_SIZE] != expected {
        return Err(Error::NotMagic);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::memory::WriteOptions;
    use crate::tag::operations::write_range;
    use crate::tag::Session;
    use crate::transport::mock::MockTransport;

    fn selected_session(mock: MockTransport) -> Session<'static> {
        let mut session = Session::open(Box::new(mock), None).unwrap();
        session.select().unwrap();
        session
    }

    #[test]
    fn magic_unlock_sends_halt_then_bit_frames() {
        let mut mock = MockTransport::new();
        mock.push_target(Some(MockTransport::sample_target()));
        mock.push_transient(); // halted tag never answers HLTA
        mock.push_reply(vec![0x0A]); // 7-bit unlock ack
        mock.push_reply(vec![0x0A]); // byte unlock ack

        let mut session = selected_session(mock);
        magic_unlock(&mut session).unwrap();
    }

    #[test]
    fn uid_write_without_magic_card_fails() {
        let mut mock = MockTransport::new();
        mock.push_target(Some(MockTransport::sample_target()));
        mock.push_transient(); // HLTA, ignored
        mock.push_transient(); // 7-bit frame rejected: not a magic card

        let opts = WriteOptions {
            write_uid: true,
            write_lock: true,
            write_otp: true,
        };
        let image = Image::default();
        let mut session = selected_session(mock);
        assert!(matches!(
            write_range(&mut session, &image, &opts),
            Err(Error::NotMagic)
        ));
    }

    #[test]
    fn uid_write_verification_mismatch_fails() {
        let mut mock = MockTransport::new();
        mock.push_target(Some(MockTransport::sample_target()));
        mock.push_transient(); // HLTA
        mock.push_reply(vec![0x0A]); // 7-bit ack
        mock.push_reply(vec![0x0A]); // byte ack
        mock.push_reply(vec![0x0A]); // page-0 write ack
        mock.push_reply(vec![0xFF; 16]); // readback does not match

        let mut image = Image::default();
        image.set_page(0, [0x04, 0x11, 0x22, 0x33]);

        let mut session = selected_session(mock);
        assert!(matches!(
            unlock_for_uid_write(&mut session, &image),
            Err(Error::NotMagic)
        ));
    }

    #[test]
    fn uid_write_verification_match_succeeds() {
        let mut mock = MockTransport::new();
        mock.push_target(Some(MockTransport::sample_target()));
        mock.push_transient(); // HLTA
        mock.push_reply(vec![0x0A]);
        mock.push_reply(vec![0x0A]);
        mock.push_reply(vec![0x0A]); // page-0 write ack
        let mut readback = vec![0u8; 16];
        readback[..4].copy_from_slice(&[0x04, 0x11, 0x22, 0x33]);
        mock.push_reply(readback);

        let mut image = Image::default();
        image.set_page(0, [0x04, 0x11, 0x22, 0x33]);

        let mut session = selected_session(mock);
        unlock_for_uid_write(&mut session, &image).unwrap();
    }
}
