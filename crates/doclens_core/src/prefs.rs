//! crates/doclens_core/src/prefs.rs
//!
//! The client preference store: UI choices (language, theme) persisted per
//! client in a JSON file. A single explicit store object with `get`/`set`
//! accessors replaces the original's ambient key-value storage; last write
//! wins, no conflict resolution, single-writer model.

use crate::domain::{ClientPreferences, TextDirection};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Language codes rendered right-to-left. Everything else is left-to-right.
const RTL_LANGUAGE_CODES: [&str; 3] = ["ur", "ks", "sd"];

/// The selectable languages (display name, ISO code).
const LANGUAGES: [(&str, &str); 22] = [
    ("English", "en"),
    ("Hindi", "hi"),
    ("Bengali", "bn"),
    ("Telugu", "te"),
    ("Marathi", "mr"),
    ("Tamil", "ta"),
    ("Urdu", "ur"),
    ("Gujarati", "gu"),
    ("Kannada", "kn"),
    ("Odia", "or"),
    ("Malayalam", "ml"),
    ("Punjabi", "pa"),
    ("Assamese", "as"),
    ("Maithili", "mai"),
    ("Sanskrit", "sa"),
    ("Santali", "sat"),
    ("Kashmiri", "ks"),
    ("Nepali", "ne"),
    ("Konkani", "kok"),
    ("Dogri", "doi"),
    ("Sindhi", "sd"),
    ("Bodo", "brx"),
];

/// One entry of the language catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Language {
    pub name: &'static str,
    pub code: &'static str,
}

/// The catalog of selectable languages, used by the interface layer to
/// validate incoming language codes.
pub fn language_catalog() -> Vec<Language> {
    LANGUAGES
        .iter()
        .map(|(name, code)| Language { name, code })
        .collect()
}

pub fn is_known_language_code(code: &str) -> bool {
    LANGUAGES.iter().any(|(_, c)| *c == code)
}

/// Derives the text direction for a language code.
pub fn resolve_direction(language_code: &str) -> TextDirection {
    if RTL_LANGUAGE_CODES.contains(&language_code) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("could not read preference file: {0}")]
    Read(std::io::Error),
    #[error("could not write preference file: {0}")]
    Write(std::io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// File-backed preference store keyed by client id. Reads hit the in-memory
/// map; every `set` rewrites the backing file so preferences survive a
/// restart. The mutex serializes writers across concurrent requests.
pub struct PreferenceStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, ClientPreferences>>,
}

impl PreferenceStore {
    /// Opens the store, loading any previously persisted preferences. A
    /// missing file is an empty store, not an error.
    pub async fn open(path: PathBuf) -> Result<Self, PrefsError> {
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(PrefsError::Read(e)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub async fn get(&self, client_id: &str) -> Option<ClientPreferences> {
        self.entries.lock().await.get(client_id).cloned()
    }

    /// Overwrites the client's preferences and persists immediately.
    /// Last write wins.
    pub async fn set(
        &self,
        client_id: &str,
        prefs: ClientPreferences,
    ) -> Result<(), PrefsError> {
        let mut entries = self.entries.lock().await;
        entries.insert(client_id.to_string(), prefs);
        self.persist(&entries).await
    }

    /// Writes to a sibling temp file then renames, so a crash mid-write
    /// never leaves a truncated preference file behind.
    async fn persist(
        &self,
        entries: &HashMap<String, ClientPreferences>,
    ) -> Result<(), PrefsError> {
        let json = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(PrefsError::Write)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(PrefsError::Write)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urdu() -> ClientPreferences {
        ClientPreferences {
            selected_language: "Urdu".to_string(),
            language_code: "ur".to_string(),
            theme: "dark".to_string(),
        }
    }

    #[test]
    fn direction_is_rtl_only_for_the_fixed_code_set() {
        assert_eq!(resolve_direction("ur"), TextDirection::Rtl);
        assert_eq!(resolve_direction("ks"), TextDirection::Rtl);
        assert_eq!(resolve_direction("sd"), TextDirection::Rtl);
        assert_eq!(resolve_direction("en"), TextDirection::Ltr);
        assert_eq!(resolve_direction("hi"), TextDirection::Ltr);
        assert_eq!(resolve_direction("not-a-code"), TextDirection::Ltr);
    }

    #[test]
    fn catalog_codes_are_all_known() {
        for lang in language_catalog() {
            assert!(is_known_language_code(lang.code));
        }
        assert!(!is_known_language_code("xx"));
    }

    #[tokio::test]
    async fn get_returns_none_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("prefs.json"))
            .await
            .unwrap();
        assert!(store.get("client-1").await.is_none());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("prefs.json"))
            .await
            .unwrap();

        store.set("client-1", ClientPreferences::default()).await.unwrap();
        store.set("client-1", urdu()).await.unwrap();

        assert_eq!(store.get("client-1").await.unwrap(), urdu());
    }

    #[tokio::test]
    async fn preferences_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = PreferenceStore::open(path.clone()).await.unwrap();
        store.set("client-1", urdu()).await.unwrap();
        drop(store);

        let reopened = PreferenceStore::open(path).await.unwrap();
        assert_eq!(reopened.get("client-1").await.unwrap(), urdu());
    }
}
