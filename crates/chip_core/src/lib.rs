mod cpu;
mod display;
mod errors;
mod font;
pub mod globals;
mod snapshot;
mod utils;

pub use cpu::{BoundsPolicy, Cpu};
pub use errors::ChipError;
pub use snapshot::Snapshot;
