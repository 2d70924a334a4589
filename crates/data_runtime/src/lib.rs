//! data_runtime: config schemas and loaders.
//!
//! Match tuning lives in `data/config/*.toml` at the workspace root;
//! every loader falls back to compiled defaults and honors env
//! overrides so the core never fails to boot on missing data.

use std::path::PathBuf;

pub mod configs {
    pub mod knockback;
    pub mod match_rules;
    pub mod telemetry;
    pub mod weapon;
}

/// Resolve the shared `data/` directory (workspace root first, then
/// crate-local for out-of-tree checkouts).
pub(crate) fn data_root() -> PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() {
        ws
    } else {
        here.join("data")
    }
}
