// src/lang/mod.rs
//! Language filter: two optional scoring backends combined by an OR-threshold rule.
//!
//! - statistical detector (`whatlang`): probability-like confidence for the target language
//! - dictionary ratio (hunspell via `spellbook`, or a plain word list)
//!
//! A backend that could not be initialized is `None` and never votes "keep".
//! Low evidence (short text, few words) is not "unavailable": it scores 0.

pub mod dictionary;
pub mod statistical;
pub mod target;

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;

pub use dictionary::{DictionaryScorer, HunspellDictionary, WordList, WordLookup};
pub use statistical::StatisticalScorer;
pub use target::TargetLanguage;

/// Keep/drop record for one text. Not persisted; used for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierVerdict {
    pub keep: bool,
    pub statistical: Option<f64>,
    pub dictionary: Option<f64>,
}

impl fmt::Display for ClassifierVerdict {
    /// Unavailable backends print as -1, matching the operator-facing log format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stat={:.3} dict={:.3}",
            self.statistical.unwrap_or(-1.0),
            self.dictionary.unwrap_or(-1.0)
        )
    }
}

/// The decision rule. `None` means the backend is unavailable and cannot trigger keep.
pub fn decide(statistical: Option<f64>, dictionary: Option<f64>, threshold: f64) -> bool {
    statistical.is_some_and(|s| s >= threshold) || dictionary.is_some_and(|d| d >= threshold)
}

pub fn validate_threshold(threshold: f64) -> Result<f64, ConfigError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ConfigError::ThresholdOutOfRange(threshold))
    }
}

#[derive(Debug)]
pub struct LanguageClassifier {
    language: TargetLanguage,
    threshold: f64,
    statistical: Option<StatisticalScorer>,
    dictionary: Option<DictionaryScorer>,
}

impl LanguageClassifier {
    /// Fails when the threshold is out of range or when both backends are missing:
    /// a filter the operator asked for must not silently turn into "drop everything".
    pub fn new(
        language: TargetLanguage,
        threshold: f64,
        statistical: Option<StatisticalScorer>,
        dictionary: Option<DictionaryScorer>,
    ) -> Result<Self, ConfigError> {
        let threshold = validate_threshold(threshold)?;
        if statistical.is_none() && dictionary.is_none() {
            return Err(ConfigError::NoClassifierBackend {
                language: language.code.to_string(),
            });
        }
        Ok(Self {
            language,
            threshold,
            statistical,
            dictionary,
        })
    }

    /// Build from settings, initializing whatever backends are usable on this machine.
    pub fn from_settings(settings: &LanguageFilterSettings) -> Result<Self, ConfigError> {
        let threshold = validate_threshold(settings.threshold)?;
        let language = TargetLanguage::from_code(&settings.language)?;

        let statistical = StatisticalScorer::new(&language);

        let lookup: Option<Box<dyn WordLookup>> = match &settings.wordlist {
            Some(p) => match WordList::load(p) {
                Ok(w) => Some(Box::new(w)),
                Err(e) => {
                    tracing::warn!(target: "lang", error = ?e, "word list unavailable");
                    None
                }
            },
            None => {
                let explicit = settings.hunspell_aff.clone().zip(settings.hunspell_dic.clone());
                let candidates = dictionary::hunspell_candidates(&language, explicit);
                dictionary::load_first_hunspell(&candidates)
                    .map(|d| Box::new(d) as Box<dyn WordLookup>)
            }
        };
        let dictionary = lookup.map(|l| DictionaryScorer::new(&language, l));

        let clf = Self::new(language, threshold, statistical, dictionary)?;
        tracing::info!(
            target: "lang",
            language = clf.language.code,
            threshold = clf.threshold,
            statistical = clf.has_statistical(),
            dictionary = clf.dictionary.as_ref().map(|d| d.backend_name()).unwrap_or("none"),
            "language filter enabled"
        );
        Ok(clf)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn language(&self) -> &TargetLanguage {
        &self.language
    }

    pub fn has_statistical(&self) -> bool {
        self.statistical.is_some()
    }

    pub fn has_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    pub fn classify(&self, text: &str) -> ClassifierVerdict {
        let statistical = self.statistical.as_ref().map(|s| s.score(text));
        let dictionary = self.dictionary.as_ref().map(|d| d.score(text));
        ClassifierVerdict {
            keep: decide(statistical, dictionary, self.threshold),
            statistical,
            dictionary,
        }
    }
}

/// Operator-facing language filter options.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageFilterSettings {
    pub language: String,
    pub threshold: f64,
    pub hunspell_aff: Option<PathBuf>,
    pub hunspell_dic: Option<PathBuf>,
    pub wordlist: Option<PathBuf>,
}

/// Short, stable id for a text so skip logs never carry the raw content.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
