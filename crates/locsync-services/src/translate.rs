//! Driving translation work over pending groups.
//!
//! The driver owns batching, bounded parallelism, retries, checkpoints and
//! cancellation; a [`Translator`] only turns one batch of requests into
//! results.

use crate::pending::TranslationGroup;
use crate::Result;
use color_eyre::eyre::bail;
use locsync_catalog::exchange::load_pending;
use locsync_core::CatalogEntry;
use locsync_domain::{ApplySummary, PendingItem};
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub id: usize,
    pub namespace: String,
    pub key: String,
    pub source: String,
    pub occurrences: usize,
}

impl From<&TranslationGroup> for TranslationRequest {
    fn from(g: &TranslationGroup) -> Self {
        Self {
            id: g.id,
            namespace: g.namespace.clone(),
            key: g.key.clone(),
            source: g.source.clone(),
            occurrences: g.occurrence_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub id: usize,
    pub translated: String,
}

/// Turns a batch of requests into translations. Requests it has no answer
/// for are simply left out of the result.
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;
    fn translate_batch(
        &self,
        requests: &[TranslationRequest],
        target_language: &str,
    ) -> Result<Vec<TranslationResult>>;
}

/// Answers from a filled-in pending export, looked up by source text.
#[derive(Debug, Clone, Default)]
pub struct FileTranslator {
    by_source: HashMap<String, String>,
}

impl FileTranslator {
    pub fn from_items(items: &[PendingItem]) -> Self {
        let by_source = items
            .iter()
            .filter_map(|it| {
                let t = it.translated.trim();
                (!t.is_empty()).then(|| (it.source.trim().to_string(), t.to_string()))
            })
            .collect();
        Self { by_source }
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

impl Translator for FileTranslator {
    fn name(&self) -> &str {
        "file"
    }

    fn translate_batch(
        &self,
        requests: &[TranslationRequest],
        _target_language: &str,
    ) -> Result<Vec<TranslationResult>> {
        Ok(requests
            .iter()
            .filter_map(|r| {
                self.by_source.get(r.source.trim()).map(|t| TranslationResult {
                    id: r.id,
                    translated: t.clone(),
                })
            })
            .collect())
    }
}

/// Translator backends the tool can be configured with.
#[derive(Debug, Clone)]
pub enum TranslatorKind {
    File(FileTranslator),
}

impl TranslatorKind {
    /// Build the file-backed translator from a filled pending export.
    pub fn from_filled_file(path: &Path) -> Result<Self> {
        let items = load_pending(path)?;
        let translator = FileTranslator::from_items(&items);
        if translator.is_empty() {
            bail!("{} has no filled-in translations", path.display());
        }
        tracing::debug!(event = "translator_ready", kind = "file", answers = translator.len());
        Ok(TranslatorKind::File(translator))
    }
}

impl Translator for TranslatorKind {
    fn name(&self) -> &str {
        match self {
            TranslatorKind::File(t) => t.name(),
        }
    }

    fn translate_batch(
        &self,
        requests: &[TranslationRequest],
        target_language: &str,
    ) -> Result<Vec<TranslationResult>> {
        match self {
            TranslatorKind::File(t) => t.translate_batch(requests, target_language),
        }
    }
}

/// Shared flag flipped to stop a translation run early.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `d` unless cancelled first. Returns false on cancellation.
    pub fn sleep(&self, d: Duration) -> bool {
        let deadline = Instant::now() + d;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(Duration::from_millis(50)));
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub batch_size: usize,
    pub concurrency: usize,
    /// Save after this many rows were updated; 0 saves only at the end.
    pub checkpoint: usize,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            batch_size: 5,
            concurrency: 4,
            checkpoint: 20,
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl DriverOptions {
    /// Delay before retry number `attempt` (1-based), with up to 10% jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let base = self.base_delay.saturating_mul(factor).min(self.max_delay);
        let jitter_ms = (base.as_millis() / 10) as u64;
        let jitter = if jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=jitter_ms)
        } else {
            0
        };
        base + Duration::from_millis(jitter)
    }
}

pub struct TranslationDriver<'a, T: Translator + ?Sized> {
    translator: &'a T,
    options: DriverOptions,
    cancel: CancellationToken,
}

impl<'a, T: Translator + ?Sized> TranslationDriver<'a, T> {
    pub fn new(translator: &'a T, options: DriverOptions, cancel: CancellationToken) -> Self {
        Self {
            translator,
            options,
            cancel,
        }
    }

    /// Translate `groups` and write results into `entries`.
    ///
    /// `save` is called at every checkpoint and once more at the end, also
    /// after cancellation. Errors from `save` abort the run.
    pub fn run<F>(
        &self,
        entries: &mut [CatalogEntry],
        groups: &[TranslationGroup],
        target_language: &str,
        mut save: F,
    ) -> Result<ApplySummary>
    where
        F: FnMut(&[CatalogEntry]) -> Result<()>,
    {
        let batch_size = self.options.batch_size.max(1);
        let concurrency = self.options.concurrency.max(1);
        let batches: Vec<&[TranslationGroup]> = groups.chunks(batch_size).collect();
        let mut summary = ApplySummary::default();
        let mut since_checkpoint = 0usize;

        tracing::info!(
            event = "translate_start",
            translator = self.translator.name(),
            language = target_language,
            groups = groups.len(),
            batches = batches.len()
        );

        for wave in batches.chunks(concurrency) {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let outcomes: Vec<(&[TranslationGroup], Option<Vec<TranslationResult>>)> =
                std::thread::scope(|s| {
                    let handles: Vec<_> = wave
                        .iter()
                        .map(|batch| {
                            let batch: &[TranslationGroup] = batch;
                            s.spawn(move || (batch, self.translate_with_retry(batch, target_language)))
                        })
                        .collect();
                    handles
                        .into_iter()
                        .zip(wave.iter())
                        .map(|(h, batch)| h.join().unwrap_or((*batch, None)))
                        .collect()
                });

            for (batch, results) in outcomes {
                let Some(results) = results else {
                    summary.failed += batch.len();
                    continue;
                };
                let by_id: HashMap<usize, &TranslationGroup> =
                    batch.iter().map(|g| (g.id, g)).collect();
                for res in results {
                    let Some(group) = by_id.get(&res.id) else {
                        tracing::warn!(event = "translate_unknown_id", id = res.id);
                        continue;
                    };
                    let text = res.translated.trim();
                    if text.is_empty() {
                        continue;
                    }
                    for &idx in &group.indexes {
                        if let Some(e) = entries.get_mut(idx) {
                            e.translated = Some(text.to_string());
                            summary.entries += 1;
                            since_checkpoint += 1;
                        }
                    }
                    summary.groups += 1;
                }
            }

            if self.options.checkpoint > 0 && since_checkpoint >= self.options.checkpoint {
                save(&*entries)?;
                tracing::debug!(event = "translate_checkpoint", rows = since_checkpoint);
                since_checkpoint = 0;
            }
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
        }

        save(&*entries)?;
        tracing::info!(
            event = "translate_done",
            groups = summary.groups,
            entries = summary.entries,
            failed = summary.failed,
            cancelled = summary.cancelled
        );
        Ok(summary)
    }

    fn translate_with_retry(
        &self,
        batch: &[TranslationGroup],
        target_language: &str,
    ) -> Option<Vec<TranslationResult>> {
        let requests: Vec<TranslationRequest> = batch.iter().map(TranslationRequest::from).collect();
        let attempts = self.options.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.translator.translate_batch(&requests, target_language) {
                Ok(results) => return Some(results),
                Err(e) => {
                    tracing::warn!(
                        event = "translate_batch_failed",
                        attempt,
                        max_attempts = attempts,
                        first_id = requests.first().map(|r| r.id),
                        error = %e
                    );
                    if attempt == attempts || !self.cancel.sleep(self.options.backoff(attempt)) {
                        break;
                    }
                }
            }
        }
        None
    }
}
