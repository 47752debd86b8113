pub mod snapshot;
pub mod types;

pub use snapshot::{DEFAULT_SNAPSHOT_FILE, ResourceExport};
pub use types::*;
