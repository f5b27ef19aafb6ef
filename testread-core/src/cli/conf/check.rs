use crate::conf::{ConfigError, load_config};
use miette::Report;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ max_pages_per_slice = {}", cfg.max_pages_per_slice);
            println!("✔ max_slices = {}", cfg.max_slices);
            println!("✔ max_record_limit = {}", cfg.max_record_limit);
            Ok(())
        }
        Err(err) => {
            print_config_error(err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: ConfigError, plain: bool) {
    let hint = config_error_hint(&err);
    if plain {
        eprintln!("{}", err);
    } else {
        eprintln!();
        eprintln!("{:?}", Report::new(err));
    }
    if let Some(hint) = hint {
        eprintln!();
        eprintln!("{}", hint);
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::Parse { .. } | ConfigError::ZeroLimit { .. } => Some(
            "Reader settings live under a single [reader] table.\n\
             \n\
             Example:\n\
             \n\
             [reader]\n\
             max_pages_per_slice = 5\n\
             max_slices          = 5\n\
             max_record_limit    = 1000",
        ),

        ConfigError::ReadFile { .. } => Some(
            "Pass the path to an existing TOML file, or omit --config to use the defaults.",
        ),

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}
