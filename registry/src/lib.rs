pub mod model;
pub mod registry;
pub mod store;

pub use model::Subscriber;
pub use registry::SubscriberRegistry;
pub use store::SubscriberStore;
