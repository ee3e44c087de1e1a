pub mod config;
pub mod notifier;
pub mod observability;

pub use config::Config;
pub use notifier::{Notifier, RunError, Settings};
