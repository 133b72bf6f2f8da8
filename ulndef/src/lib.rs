// ulndef/src/lib.rs

//! ulndef
//!
//! Read and write a single NDEF URI record on MIFARE Ultralight and
//! Ultralight EV1 tags through an ISO/IEC 14443 Type A reader.
#![warn(missing_docs)]

pub mod actions;
pub mod constants;
pub mod error;
pub mod ndef;
pub mod output;
pub mod prelude;
pub mod protocol;
pub mod tag;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
