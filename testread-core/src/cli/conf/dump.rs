use crate::conf::{ConfigFile, load_config};
use serde::Serialize;
use std::path::PathBuf;

pub fn dump(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let file = ConfigFile {
        reader: load_config(&path)?,
    };

    if json {
        dump_json(&file)
    } else {
        dump_toml(&file)
    }
}

fn dump_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

fn dump_toml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = toml::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}
