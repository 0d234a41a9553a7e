//! Orchestration layer over the catalog crates.

pub mod diff;
pub mod import;
pub mod merge;
pub mod pack;
pub mod pending;
pub mod reconcile;
pub mod sync;
pub mod translate;

pub use diff::{diff_catalogs, diff_document, write_diff_report};
pub use import::apply_import_records;
pub use locsync_core::Result;
pub use merge::{merge_collected, reset_translations, MergeOptions, MergeOutcome};
pub use pack::export_for_pack;
pub use pending::{build_translation_queue, count_pending, is_pending, pending_items, TranslationGroup};
pub use reconcile::reconcile;
pub use sync::{filter_collected, sync_catalog, SyncOptions};
pub use translate::{
    CancellationToken, DriverOptions, FileTranslator, TranslationDriver, Translator, TranslatorKind,
};
