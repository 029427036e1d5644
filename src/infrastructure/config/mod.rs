//! Application configuration.

pub mod app_config;
pub mod args;
pub mod option_store;
pub mod storage;

pub use app_config::{AppConfig, LogLevel};
pub use args::{CliArgs, Command};
pub use option_store::TomlOptionStore;
pub use storage::{ConfigError, StorageManager};
