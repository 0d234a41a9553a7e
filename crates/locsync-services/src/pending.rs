use locsync_config::SkipRules;
use locsync_core::CatalogEntry;
use locsync_domain::PendingItem;
use std::collections::HashMap;

/// Needs translation: not skipped, no translation yet, and there is text to
/// translate.
pub fn is_pending(entry: &CatalogEntry, rules: &SkipRules) -> bool {
    !entry.has_translation() && entry.effective_source().is_some() && !rules.skips(entry)
}

pub fn count_pending(entries: &[CatalogEntry], rules: &SkipRules) -> usize {
    entries.iter().filter(|e| is_pending(e, rules)).count()
}

/// Pending rows sharing one effective source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationGroup {
    pub id: usize,
    pub source: String,
    /// Identity of the first row seen with this text.
    pub namespace: String,
    pub key: String,
    /// Positions of every row in the group.
    pub indexes: Vec<usize>,
}

impl TranslationGroup {
    pub fn occurrence_count(&self) -> usize {
        self.indexes.len()
    }
}

/// Group pending rows by effective source, in first-occurrence order.
/// `limit` caps the number of groups, not rows.
pub fn build_translation_queue(
    entries: &[CatalogEntry],
    rules: &SkipRules,
    limit: Option<usize>,
) -> Vec<TranslationGroup> {
    let mut groups: Vec<TranslationGroup> = Vec::new();
    let mut by_text: HashMap<&str, usize> = HashMap::new();
    for (idx, e) in entries.iter().enumerate() {
        if !is_pending(e, rules) {
            continue;
        }
        let Some(text) = e.effective_source() else {
            continue;
        };
        match by_text.get(text) {
            Some(&g) => groups[g].indexes.push(idx),
            None => {
                by_text.insert(text, groups.len());
                groups.push(TranslationGroup {
                    id: groups.len(),
                    source: text.to_string(),
                    namespace: e.namespace.clone(),
                    key: e.key.clone(),
                    indexes: vec![idx],
                });
            }
        }
    }
    if let Some(limit) = limit {
        groups.truncate(limit);
    }
    groups
}

pub fn pending_items(groups: &[TranslationGroup]) -> Vec<PendingItem> {
    groups
        .iter()
        .map(|g| PendingItem {
            id: g.id,
            namespace: g.namespace.clone(),
            key: g.key.clone(),
            source: g.source.clone(),
            occurrences: g.occurrence_count(),
            translated: String::new(),
        })
        .collect()
}
