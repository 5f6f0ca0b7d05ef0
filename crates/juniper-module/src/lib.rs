//! Module Loader: enumerates a SWORD installation's `mods.d/*.conf`
//! files and parses each into a [`Module`] descriptor.
//!
//! # Example
//!
//! ```rust,no_run
//! let modules = juniper_module::load_modules(std::path::Path::new("/path/to/sword"))
//!     .expect("failed to scan installation");
//! for module in modules {
//!     println!("{}: {:?}", module.identity, module.driver);
//! }
//! ```

#![warn(missing_docs)]

use std::path::Path;

use juniper_formats::conf;
pub use juniper_formats::{Driver, JuniperError, Module, ModuleClass};
use tracing::warn;

/// Result type for module-loading operations.
pub type Result<T> = std::result::Result<T, JuniperError>;

/// Scans `sword_root/mods.d/*.conf`, parses each file, and returns the
/// descriptors that parsed successfully.
///
/// A single malformed `.conf` does not fail the whole scan: it is
/// logged at `warn` level with its path and excluded from the
/// returned list. This is the only place in the core where a
/// per-item failure is swallowed rather than propagated.
///
/// # Errors
///
/// Returns [`JuniperError::FileOpen`] only if `sword_root/mods.d`
/// itself cannot be read (missing directory, permission failure).
pub fn load_modules(sword_root: &Path) -> Result<Vec<Module>> {
    let mods_d = sword_root.join("mods.d");
    let read_dir = std::fs::read_dir(&mods_d).map_err(|e| JuniperError::file_open(&mods_d, e))?;

    let mut modules = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %mods_d.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "conf") {
            continue;
        }

        match conf::parse_file(&path) {
            Ok(module) => modules.push(module),
            Err(error) => warn!(path = %path.display(), %error, "skipping unparseable conf file"),
        }
    }

    Ok(modules)
}
