use std::path::PathBuf;

pub const DEFAULT_SOURCE_EXT: &str = "bpasm";

pub fn default_suite_dir() -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "asm"].iter().collect()
}
