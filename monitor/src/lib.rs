pub mod alert;
pub mod classify;
pub mod config;
pub mod engine;
pub mod manager;
pub mod resolve;
pub mod showtime;

pub use config::MonitorConfig;
pub use engine::{MonitorEngine, ScanOutcome, Subscription};
pub use manager::MonitorManager;
