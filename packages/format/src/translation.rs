//! Translation tables for localizable schema strings.
//!
//! Any schema string starting with `@` is a key into the table of the
//! active language, falling back to the `"default"` language, then to the
//! key itself. Resolution never fails.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Prefix marking a schema string as a translation key.
pub const TRANSLATION_MARKER: char = '@';

/// Name of the fallback language.
pub const DEFAULT_LANGUAGE: &str = "default";

/// `{ language: { key: text } }`
///
/// The default language is stored under `"default"` whatever its case on
/// the way in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Translations {
    languages: BTreeMap<String, BTreeMap<String, String>>,
}

fn language_key(language: String) -> String {
    if language.eq_ignore_ascii_case(DEFAULT_LANGUAGE) {
        DEFAULT_LANGUAGE.to_string()
    } else {
        language
    }
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Insert a single translation.
    pub fn insert(
        &mut self,
        language: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.languages
            .entry(language_key(language.into()))
            .or_default()
            .insert(key.into(), text.into());
    }

    /// Merge another table into this one, key by key. Entries of `other` win.
    pub fn merge(&mut self, other: Translations) {
        for (language, words) in other.languages {
            self.languages
                .entry(language_key(language))
                .or_default()
                .extend(words);
        }
    }

    /// Languages with translations, excluding the default language.
    pub fn languages(&self) -> Vec<&str> {
        self.languages
            .keys()
            .filter(|l| *l != DEFAULT_LANGUAGE)
            .map(String::as_str)
            .collect()
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|words| words.get(key))
            .map(String::as_str)
    }

    /// Resolve `text` for `language`.
    ///
    /// Plain text is returned unchanged. A `@key` marker resolves through the
    /// language, then the default language, then degrades to the bare key.
    pub fn localize<'a>(&'a self, text: &'a str, language: Option<&str>) -> Cow<'a, str> {
        let Some(key) = text.strip_prefix(TRANSLATION_MARKER) else {
            return Cow::Borrowed(text);
        };

        language
            .and_then(|language| self.lookup(language, key))
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key))
            .map_or(Cow::Borrowed(key), Cow::Borrowed)
    }
}

impl<'de> Deserialize<'de> for Translations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let languages = BTreeMap::<String, BTreeMap<String, String>>::deserialize(deserializer)?;
        let mut translations = Translations::new();
        translations.merge(Translations { languages });
        Ok(translations)
    }
}
