use serde::{Deserialize, Serialize};

/// Ceilings applied to every test read a handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    /// A slice holding this many pages marks the read as limited.
    #[serde(default = "default_max_pages_per_slice")]
    pub max_pages_per_slice: usize,

    /// This many slices marks the read as limited.
    #[serde(default = "default_max_slices")]
    pub max_slices: usize,

    /// Record budget when the caller does not ask for one, and the upper
    /// bound for the ones they do ask for.
    #[serde(default = "default_max_record_limit")]
    pub max_record_limit: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_pages_per_slice: default_max_pages_per_slice(),
            max_slices: default_max_slices(),
            max_record_limit: default_max_record_limit(),
        }
    }
}

fn default_max_pages_per_slice() -> usize {
    5
}

fn default_max_slices() -> usize {
    5
}

fn default_max_record_limit() -> usize {
    1000
}

/// On-disk layout: everything lives under `[reader]`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub reader: ReaderConfig,
}
