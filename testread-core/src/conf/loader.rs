use crate::conf::error::ConfigError;
use crate::conf::types::{ConfigFile, ReaderConfig};
use crate::read::MAX_RECORD_LIMIT;
use std::fs;
use std::path::Path;

pub fn load_config(path: &Path) -> Result<ReaderConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO
    //--------------------------------------------------------------------------
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    parse_config(path, &contents)
}

/// Parses and validates config text. `path` is only used for error reporting.
pub fn parse_config(path: &Path, contents: &str) -> Result<ReaderConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(contents).map_err(|e| ConfigError::parse(path, e))?;

    validate(&file.reader)?;
    Ok(file.reader)
}

fn validate(config: &ReaderConfig) -> Result<(), ConfigError> {
    let fields = [
        ("max_pages_per_slice", config.max_pages_per_slice),
        ("max_slices", config.max_slices),
        ("max_record_limit", config.max_record_limit),
    ];

    if let Some((field, _)) = fields.iter().find(|(_, value)| *value == 0) {
        return Err(ConfigError::ZeroLimit { field: *field });
    }

    if config.max_record_limit > MAX_RECORD_LIMIT {
        return Err(ConfigError::RecordLimitTooHigh {
            value: config.max_record_limit,
            ceiling: MAX_RECORD_LIMIT,
        });
    }

    Ok(())
}
