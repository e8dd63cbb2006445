//! The transduction engine and the encoding pipeline.

mod branch;
mod pipeline;
mod transducer;

pub use branch::{Alternative, BranchSet};
pub use pipeline::BeiderMorse;
pub use transducer::{TransductionStats, Transducer};
