//! Translation bundles and lookup.
//!
//! Bundles are nested JSON documents compiled into the binary, addressed by
//! dotted keys ("common.privacyPolicy"). Every call site passes an inline
//! fallback string, so a missing or renamed key degrades to readable English
//! instead of a blank label.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Languages the client ships bundles for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Picks the locale from `DRIFTMAIL_LANG`, falling back to the system
    /// `LANG`, falling back to English.
    pub fn from_env() -> Self {
        std::env::var("DRIFTMAIL_LANG")
            .or_else(|_| std::env::var("LANG"))
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept full POSIX tags like "zh_CN.UTF-8"
        let tag = s
            .split(['_', '-', '.'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match tag.as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            _ => Err(()),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Zh => write!(f, "zh"),
        }
    }
}

/// Resolves dotted keys against the bundle of one locale.
#[derive(Debug, Clone)]
pub struct Translator {
    bundle: serde_json::Value,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        let raw = match locale {
            Locale::En => include_str!("../locales/en.json"),
            Locale::Zh => include_str!("../locales/zh.json"),
        };
        // Bundles are compiled in; a parse failure is a build defect and
        // simply yields an empty bundle so fallbacks take over.
        let bundle = serde_json::from_str(raw).unwrap_or(serde_json::Value::Null);
        Self { bundle }
    }

    /// Translates `key`, returning `fallback` when the key is absent or not
    /// a string leaf.
    pub fn t<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(fallback)
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        let mut node = &self.bundle;
        for segment in key.split('.') {
            node = node.get(segment)?;
        }
        node.as_str()
    }
}
