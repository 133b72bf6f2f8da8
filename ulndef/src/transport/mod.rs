// ulndef/src/transport/mod.rs

#[cfg(feature = "libnfc")]
pub mod libnfc;
pub mod mock;
pub mod traits;

#[cfg(feature = "libnfc")]
pub use libnfc::LibnfcTransport;
pub use mock::MockTransport;
pub use traits::Transport;
