// ulndef/src/tag/operations/read.rs

use crate::constants::{PAGE_SIZE, READ_PAGES};
use crate::tag::memory::Dump;
use crate::tag::Session;
use crate::Result;

/// Read every managed page into a fresh image, four pages per command.
///
/// A transient failure re-selects the tag and retries the window once; a
/// second failure marks its page slots failed and moves on, so partial
/// success is preserved. Replies are clamped so the image is never written
/// past `managed_pages * 4` bytes. Known PWD/PACK are merged into the
/// image afterwards.
pub fn read_all(session: &mut Session<'_>) -> Result<Dump> {
    let managed = session.managed_pages();
    let mut dump = Dump::default();

    let mut page = 0u32;
    while page < managed {
        let wanted = (managed - page).min(READ_PAGES);
        let mut retried = false;
        loop {
            match session.read_pages(page) {
                Ok(reply) => {
                    let offset = page as usize * PAGE_SIZE;
                    let valid = (wanted as usize * PAGE_SIZE).min(reply.len());
                    dump.image.as_bytes_mut()[offset..offset + valid]
                        .copy_from_slice(&reply[..valid]);
                    if valid == wanted as usize * PAGE_SIZE {
                        dump.read_pages += wanted;
                    } else {
                        // Short reply: keep what arrived, count the window failed.
                        log::warn!("short READ reply at page {}: {} bytes", page, reply.len());
                        dump.failed_pages += wanted;
                    }
                    break;
                }
                Err(err) if err.is_transient() => {
                    log::warn!("READ failed at page {}: {}", page, err);
                    session.ensure_selected()?;
                    if retried {
                        dump.failed_pages += wanted;
                        break;
                    }
                    retried = true;
                }
                Err(err) => return Err(err),
            }
        }
        page += READ_PAGES;
    }

    log::debug!(
        "{} of {} pages read ({} pages failed)",
        dump.read_pages,
        managed,
        dump.failed_pages
    );

    session.merge_secrets(&mut dump.image);
    Ok(dump)
}
