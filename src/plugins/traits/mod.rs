pub mod tracker;
pub mod notifier;
pub mod fetcher;

pub use tracker::{TrackerPlugin, ComparisonResult, ChangeType};
pub use notifier::NotifierPlugin;
pub use fetcher::PriceFetcher;
