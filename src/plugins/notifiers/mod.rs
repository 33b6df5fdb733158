// Notifier plugin implementations
pub mod console;
pub mod log;

pub use console::ConsoleNotifier;
pub use log::LogNotifier;
