// ulndef/src/transport/traits.rs

use crate::types::{DeviceInfo, Property, TargetInfo};
use crate::Result;

/// Transport trait abstracts the reader driver away from session logic.
///
/// Implementations map driver failures onto `Error::IoTransient` when a
/// re-selection of the target may recover, and `Error::IoFatal` otherwise.
pub trait Transport {
    /// List the readers known to the driver without opening any of them.
    fn enumerate_devices(&mut self) -> Result<Vec<DeviceInfo>>;

    /// Open a reader. `None` picks the first available device.
    fn open(&mut self, connstring: Option<&str>) -> Result<()>;

    /// Close the reader. Idempotent.
    fn close(&mut self);

    /// Run ISO 14443-A anti-collision and select one tag, if any is present.
    fn select_passive_target(&mut self) -> Result<Option<TargetInfo>>;

    /// List every tag currently in the field, up to `max` targets.
    fn list_targets(&mut self, max: usize) -> Result<Vec<TargetInfo>>;

    /// Exchange a byte frame with the selected tag.
    fn transceive_bytes(&mut self, tx: &[u8]) -> Result<Vec<u8>>;

    /// Exchange a frame with an explicit bit length (short frames).
    fn transceive_bits(&mut self, tx: &[u8], tx_bits: usize) -> Result<Vec<u8>>;

    /// Toggle a boolean reader property.
    fn set_property(&mut self, property: Property, value: bool) -> Result<()>;

    /// Human-readable reader name, once opened.
    fn name(&self) -> Option<String> {
        None
    }
}
