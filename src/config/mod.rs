// Configuration module: settings and loading

pub mod loader;
pub mod settings;

pub use loader::{load_config, ConfigError, ConfigLoader};
pub use settings::*;
