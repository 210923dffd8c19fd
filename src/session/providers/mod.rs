pub mod interface;
pub mod memory;
pub mod noop;
