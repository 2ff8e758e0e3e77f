pub mod accumulator;
pub mod runner;

pub use accumulator::CycleAccumulator;
pub use runner::{Cycle, CycleRunner};
