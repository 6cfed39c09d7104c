//! Layered configuration.
//!
//! Configuration is merged field by field from four tiers, lowest first:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/jobcore/jobcore.yaml`
//! 3. **User** - `~/.jobcore/jobcore.yaml`
//! 4. **Environment** - the variables below
//!
//! ## Environment Variables
//! - `JOBCORE_CONFIG_PATH` - Explicit config file (bypasses the file tiers)
//! - `JOBCORE_HOME` - Home directory root
//! - `JOBCORE_LOG_LEVEL` - Default log level
//! - `JOBCORE_PROJECT_DIR` - Project config dir (default: `./jobcore`)
//! - `JOBCORE_USER_DIR` - User config dir (default: `~/.jobcore`)

mod loader;
mod merge;
mod types;

pub use loader::{CONFIG_FILE, ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
