// Tracker plugin implementations
pub mod price;

pub use price::PriceTracker;
