// src/layouts/translation.rs
// Field-label translations, loaded in bulk and kept for the life of the cache.

use std::collections::{HashMap, HashSet};
use std::sync::{OnceLock, PoisonError, RwLock};

use super::database::error::DbResult;
use super::source::TranslationSource;

/// Labels stored on field templates are written in this language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Translated labels keyed by (language, template id). A `None` entry records
/// that storage had no translation, so the id is not queried again.
///
/// There is no eviction: entries stay until the cache is dropped or cleared.
/// Share one cache per tenant with `Arc<TranslationCache>`.
#[derive(Debug)]
pub struct TranslationCache {
    default_language: String,
    labels: RwLock<HashMap<(String, i64), Option<String>>>,
    available: OnceLock<bool>,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl TranslationCache {
    pub fn new(default_language: &str) -> Self {
        Self {
            default_language: lang_key(default_language),
            labels: RwLock::new(HashMap::new()),
            available: OnceLock::new(),
        }
    }

    pub fn is_default_language(&self, lang: &str) -> bool {
        let key = lang_key(lang);
        key.is_empty() || key == self.default_language
    }

    /// Load translations for every id not cached yet, in one batch.
    /// Returns how many ids were queried.
    pub fn prime(&self, source: &dyn TranslationSource, ids: &[i64], lang: &str) -> DbResult<usize> {
        if self.is_default_language(lang) || ids.is_empty() {
            return Ok(0);
        }

        if !self.translations_available(source)? {
            return Ok(0);
        }

        let lang = lang_key(lang);
        let missing: Vec<i64> = {
            let labels = self.labels.read().unwrap_or_else(PoisonError::into_inner);
            let mut seen = HashSet::new();
            ids.iter()
                .copied()
                .filter(|id| seen.insert(*id) && !labels.contains_key(&(lang.clone(), *id)))
                .collect()
        };

        if missing.is_empty() {
            tracing::trace!("prime: all {} labels for '{}' already cached", ids.len(), lang);
            return Ok(0);
        }

        let found: HashMap<i64, String> = source.template_labels(&missing, &lang)?.into_iter().collect();
        tracing::debug!(
            "prime: queried {} labels for '{}', {} translated",
            missing.len(),
            lang,
            found.len()
        );

        let mut labels = self.labels.write().unwrap_or_else(PoisonError::into_inner);
        for id in &missing {
            labels.insert((lang.clone(), *id), found.get(id).cloned());
        }
        Ok(missing.len())
    }

    /// Translated label, or `fallback` for the default language and for ids
    /// without a cached translation.
    pub fn get(&self, info_template_id: i64, fallback: &str, lang: &str) -> String {
        if self.is_default_language(lang) {
            return fallback.to_string();
        }
        let labels = self.labels.read().unwrap_or_else(PoisonError::into_inner);
        labels
            .get(&(lang_key(lang), info_template_id))
            .and_then(|label| label.clone())
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Preload a label without going to storage.
    pub fn insert(&self, lang: &str, info_template_id: i64, label: &str) {
        let mut labels = self.labels.write().unwrap_or_else(PoisonError::into_inner);
        labels.insert((lang_key(lang), info_template_id), Some(label.to_string()));
    }

    pub fn clear(&self) {
        self.labels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.labels.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Checked once per cache; a missing table means no translations at all.
    fn translations_available(&self, source: &dyn TranslationSource) -> DbResult<bool> {
        if let Some(available) = self.available.get() {
            return Ok(*available);
        }
        let available = source.translations_available()?;
        if !available {
            tracing::info!("Translation table not present; labels fall back to template text");
        }
        Ok(*self.available.get_or_init(|| available))
    }
}

fn lang_key(lang: &str) -> String {
    lang.trim().to_ascii_lowercase()
}
