// ulndef/src/tag/operations/write.rs

use crate::tag::memory::{Image, WriteOptions, WriteStats};
use crate::tag::operations::unlock;
use crate::tag::Session;
use crate::Result;

/// Write the image to the tag, one page at a time in ascending order.
///
/// Pages 0-1 are skipped unless `write_uid` is set, in which case the card
/// must first pass the magic unlock and page-0 verification. Page 2 is
/// skipped unless `write_lock`, page 3 unless `write_otp`. Each failed
/// write re-selects the tag before the next page; the URI fast path is
/// simply this function with default options, which starts at page 4.
pub fn write_range(
    session: &mut Session<'_>,
    image: &Image,
    opts: &WriteOptions,
) -> Result<WriteStats> {
    let managed = session.managed_pages();
    let mut stats = WriteStats::default();

    let first_page = if opts.write_uid {
        unlock::unlock_for_uid_write(session, image)?;
        0
    } else {
        stats.skipped += 2;
        2
    };

    for page in first_page..managed {
        if page == 2 && !opts.write_lock {
            stats.skipped += 1;
            continue;
        }
        if page == 3 && !opts.write_otp {
            stats.skipped += 1;
            continue;
        }

        let mut data = [0u8; 4];
        data.copy_from_slice(image.page(page));
        match session.write_page(page, data) {
            Ok(()) => stats.written += 1,
            Err(err) if err.is_transient() => {
                log::warn!("WRITE failed at page {}: {}", page, err);
                stats.failed += 1;
                session.ensure_selected()?;
            }
            Err(err) => return Err(err),
        }
    }

    log::debug!(
        "{} of {} pages written ({} skipped, {} failed)",
        stats.written,
        managed,
        stats.skipped,
        stats.failed
    );
    Ok(stats)
}
