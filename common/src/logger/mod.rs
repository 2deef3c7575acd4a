mod cycle_id;
mod init;
mod spans;

pub use cycle_id::CycleId;
pub use init::init_logger;
pub use spans::cycle_span;
