pub mod config;
pub mod plugins;
pub mod scheduler;
pub mod scraper;
pub mod shutdown;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
