// ulndef/src/prelude.rs

//! Convenience re-exports for library consumers.

pub use crate::actions::TagReport;
pub use crate::tag::{Dump, Image, Session, WriteOptions, WriteStats};
pub use crate::transport::{MockTransport, Transport};
pub use crate::{
    Atqa, DeviceInfo, Error, Pack, Property, Pwd, Result, TagKind, TargetInfo, Uid,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, parse_hex};
