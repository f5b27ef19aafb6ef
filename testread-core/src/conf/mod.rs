mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub(crate) use types::ConfigFile;
pub use types::ReaderConfig;
