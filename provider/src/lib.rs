pub mod api;
pub mod client;
pub mod errors;
pub mod types;

pub use api::{SeatLayoutQuery, TicketingApi};
pub use client::{DistrictClient, DistrictConfig};
pub use errors::ProviderError;
