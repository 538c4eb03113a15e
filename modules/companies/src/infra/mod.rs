pub mod sinks;
pub mod storage;
