mod console_config;

pub use console_config::{ConsoleConfig, ParishInfo};
