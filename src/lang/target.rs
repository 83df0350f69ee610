// src/lang/target.rs
use crate::error::ConfigError;
use regex::Regex;

/// A language the filter can target: detector code, dictionary locale and alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLanguage {
    /// ISO 639-3, as used by the statistical detector.
    pub code: &'static str,
    /// Hunspell locale used to look up `<locale>.aff` / `<locale>.dic`.
    pub locale: &'static str,
    /// Letters beyond ASCII A-Z that words in this language may contain.
    pub extra_letters: &'static str,
}

pub const HUNGARIAN: TargetLanguage = TargetLanguage {
    code: "hun",
    locale: "hu_HU",
    extra_letters: "ÁÉÍÓÖŐÚÜŰáéíóöőúüű",
};

pub const GERMAN: TargetLanguage = TargetLanguage {
    code: "deu",
    locale: "de_DE",
    extra_letters: "ÄÖÜäöüß",
};

pub const ENGLISH: TargetLanguage = TargetLanguage {
    code: "eng",
    locale: "en_US",
    extra_letters: "",
};

const KNOWN: [(&str, TargetLanguage); 6] = [
    ("hun", HUNGARIAN),
    ("hu", HUNGARIAN),
    ("deu", GERMAN),
    ("de", GERMAN),
    ("eng", ENGLISH),
    ("en", ENGLISH),
];

impl TargetLanguage {
    pub fn from_code(code: &str) -> Result<Self, ConfigError> {
        let key = code.trim().to_ascii_lowercase();
        KNOWN
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, l)| *l)
            .ok_or_else(|| ConfigError::UnknownLanguage(code.to_string()))
    }

    /// Regex matching one word of this language's alphabet.
    pub fn word_regex(&self) -> Regex {
        let class = format!("[A-Za-z{}]+", regex::escape(self.extra_letters));
        // escaped literal letters only; cannot fail
        Regex::new(&class).expect("alphabet regex")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_639_1_aliases_resolve() {
        assert_eq!(TargetLanguage::from_code("HU").unwrap(), HUNGARIAN);
        assert_eq!(TargetLanguage::from_code("deu").unwrap(), GERMAN);
        assert!(TargetLanguage::from_code("xx").is_err());
    }

    #[test]
    fn hungarian_alphabet_keeps_accents_together() {
        let re = HUNGARIAN.word_regex();
        let words: Vec<_> = re
            .find_iter("Árvíztűrő tükörfúrógép, 2024!")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(words, vec!["Árvíztűrő", "tükörfúrógép"]);
    }
}
