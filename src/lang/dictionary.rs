// src/lang/dictionary.rs
//! Dictionary-ratio scoring: share of a text's words that a spell-check
//! dictionary for the target language accepts.

use crate::lang::target::TargetLanguage;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_WORD_CHARS: usize = 2;
pub const MIN_WORDS: usize = 5;
/// Only the first words count; long texts don't need more evidence.
pub const MAX_WORDS: usize = 400;

pub const ENV_HUNSPELL_AFF: &str = "HUNSPELL_AFF";
pub const ENV_HUNSPELL_DIC: &str = "HUNSPELL_DIC";

/// A dictionary lookup. An `Err` excludes that word from the ratio.
pub trait WordLookup: Send + Sync {
    fn check(&self, word: &str) -> Result<bool>;
    fn name(&self) -> &'static str;
}

/// Hunspell `.aff` + `.dic` pair, checked with spellbook.
pub struct HunspellDictionary {
    dict: spellbook::Dictionary,
}

impl HunspellDictionary {
    pub fn from_strs(aff: &str, dic: &str) -> Result<Self> {
        let dict = spellbook::Dictionary::new(aff, dic)
            .map_err(|e| anyhow!("parsing hunspell dictionary: {e}"))?;
        Ok(Self { dict })
    }

    pub fn load(aff: &Path, dic: &Path) -> Result<Self> {
        let aff_s = fs::read_to_string(aff)
            .with_context(|| format!("reading affix file {}", aff.display()))?;
        let dic_s = fs::read_to_string(dic)
            .with_context(|| format!("reading dictionary file {}", dic.display()))?;
        Self::from_strs(&aff_s, &dic_s)
            .with_context(|| format!("loading {} + {}", dic.display(), aff.display()))
    }
}

impl WordLookup for HunspellDictionary {
    fn check(&self, word: &str) -> Result<bool> {
        Ok(self.dict.check(word))
    }

    fn name(&self) -> &'static str {
        "hunspell"
    }
}

/// Plain list of accepted words, one per line, compared lower-cased.
#[derive(Debug, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading word list {}", path.display()))?;
        Ok(Self::new(
            content.lines().filter(|l| !l.trim_start().starts_with('#')),
        ))
    }
}

impl WordLookup for WordList {
    fn check(&self, word: &str) -> Result<bool> {
        Ok(self.words.contains(word))
    }

    fn name(&self) -> &'static str {
        "wordlist"
    }
}

/// Candidate `(aff, dic)` pairs, most specific first.
pub fn hunspell_candidates(
    lang: &TargetLanguage,
    explicit: Option<(PathBuf, PathBuf)>,
) -> Vec<(PathBuf, PathBuf)> {
    let mut out = Vec::new();
    if let Some(pair) = explicit {
        out.push(pair);
    }
    let env_aff = std::env::var(ENV_HUNSPELL_AFF).unwrap_or_default();
    let env_dic = std::env::var(ENV_HUNSPELL_DIC).unwrap_or_default();
    if !env_aff.trim().is_empty() && !env_dic.trim().is_empty() {
        out.push((
            PathBuf::from(env_aff.trim()),
            PathBuf::from(env_dic.trim()),
        ));
    }
    for dir in [
        "/usr/share/hunspell",
        "/usr/share/myspell/dicts",
        "/usr/share/myspell",
    ] {
        let base = Path::new(dir);
        out.push((
            base.join(format!("{}.aff", lang.locale)),
            base.join(format!("{}.dic", lang.locale)),
        ));
    }
    out
}

/// First candidate that exists and parses. `None` leaves the backend unavailable.
pub fn load_first_hunspell(candidates: &[(PathBuf, PathBuf)]) -> Option<HunspellDictionary> {
    for (aff, dic) in candidates {
        if !(aff.exists() && dic.exists()) {
            continue;
        }
        match HunspellDictionary::load(aff, dic) {
            Ok(d) => {
                tracing::info!(target: "lang", dic = %dic.display(), aff = %aff.display(), "hunspell dictionary loaded");
                return Some(d);
            }
            Err(e) => {
                tracing::warn!(target: "lang", error = ?e, dic = %dic.display(), "hunspell init failed");
            }
        }
    }
    tracing::warn!(
        target: "lang",
        "no usable hunspell dictionary; set HUNSPELL_AFF and HUNSPELL_DIC or install one"
    );
    None
}

pub struct DictionaryScorer {
    lookup: Box<dyn WordLookup>,
    word_re: Regex,
}

impl DictionaryScorer {
    pub fn new(lang: &TargetLanguage, lookup: Box<dyn WordLookup>) -> Self {
        Self {
            lookup,
            word_re: lang.word_regex(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.lookup.name()
    }

    /// Fraction of recognised words among the first [`MAX_WORDS`] qualifying words.
    /// Fewer than [`MIN_WORDS`] qualifying words is insufficient evidence: 0.
    pub fn score(&self, text: &str) -> f64 {
        let words: Vec<String> = self
            .word_re
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
            .collect();
        if words.len() < MIN_WORDS {
            return 0.0;
        }

        let mut ok = 0usize;
        let mut total = 0usize;
        for w in words.iter().take(MAX_WORDS) {
            match self.lookup.check(w) {
                Ok(true) => {
                    ok += 1;
                    total += 1;
                }
                Ok(false) => total += 1,
                Err(e) => {
                    tracing::trace!(target: "lang", error = %e, "word lookup failed; excluded");
                }
            }
        }
        if total == 0 {
            return 0.0;
        }
        ok as f64 / total as f64
    }
}

impl std::fmt::Debug for DictionaryScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryScorer")
            .field("backend", &self.lookup.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::target::HUNGARIAN;

    struct Flaky;
    impl WordLookup for Flaky {
        fn check(&self, word: &str) -> Result<bool> {
            match word {
                "boom" => Err(anyhow!("lookup exploded")),
                "alma" | "körte" => Ok(true),
                _ => Ok(false),
            }
        }
        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    fn scorer(words: &[&str]) -> DictionaryScorer {
        DictionaryScorer::new(&HUNGARIAN, Box::new(WordList::new(words)))
    }

    #[test]
    fn fewer_than_five_words_scores_zero() {
        let s = scorer(&["alma", "körte", "szilva"]);
        assert_eq!(s.score("alma körte szilva"), 0.0);
    }

    #[test]
    fn one_letter_words_do_not_count() {
        let s = scorer(&["alma", "körte", "szilva", "a"]);
        // only four qualifying words
        assert_eq!(s.score("a alma a körte a szilva a alma"), 0.0);
    }

    #[test]
    fn ratio_is_case_insensitive() {
        let s = scorer(&["alma", "körte", "szilva", "barack"]);
        let r = s.score("Alma KÖRTE szilva barack banana");
        assert!((r - 0.8).abs() < 1e-9, "r={r}");
    }

    #[test]
    fn failed_lookups_leave_the_ratio() {
        let s = DictionaryScorer::new(&HUNGARIAN, Box::new(Flaky));
        // 6 words, 2 errors excluded: 2 ok of 4 counted
        let r = s.score("alma körte boom boom egy kettő");
        assert!((r - 0.5).abs() < 1e-9, "r={r}");
    }

    #[test]
    fn only_first_words_are_counted() {
        let s = scorer(&["igen"]);
        let mut text = "igen ".repeat(MAX_WORDS);
        text.push_str(&"nope ".repeat(100));
        assert_eq!(s.score(&text), 1.0);
    }

    #[test]
    fn hunspell_backend_checks_words() {
        let d = HunspellDictionary::from_strs("SET UTF-8\n", "2\nalma\nkörte\n").unwrap();
        assert!(d.check("alma").unwrap());
        assert!(!d.check("xyzzy").unwrap());
    }

    #[test]
    fn explicit_pair_is_tried_first() {
        let c = hunspell_candidates(
            &HUNGARIAN,
            Some((PathBuf::from("a.aff"), PathBuf::from("a.dic"))),
        );
        assert_eq!(c[0].0, PathBuf::from("a.aff"));
        assert!(c
            .iter()
            .any(|(aff, _)| aff == Path::new("/usr/share/hunspell/hu_HU.aff")));
    }
}
