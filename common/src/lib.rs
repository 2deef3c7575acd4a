pub mod logger;

pub use logger::{CycleId, cycle_span, init_logger};
