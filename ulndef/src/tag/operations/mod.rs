// ulndef/src/tag/operations/mod.rs

pub mod read;
pub mod unlock;
pub mod write;

pub use read::read_all;
pub use unlock::magic_unlock;
pub use write::write_range;
