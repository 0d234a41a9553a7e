//! On-disk formats of the catalog pipeline.
//!
//! Everything here is I/O: the per-language NDJSON catalog, the collector's
//! JSON array, the exchange files handed to external tools, and historical
//! catalog snapshots read back out of Git.

pub mod collected;
pub mod exchange;
pub mod git;
mod record;
pub mod store;
pub mod util;

pub use collected::{load_collected, parse_collected};
pub use git::GitSnapshot;
pub use locsync_core::Result;
pub use store::{load_catalog, parse_catalog, render_catalog, save_catalog};
