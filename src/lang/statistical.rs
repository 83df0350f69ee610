// src/lang/statistical.rs
use crate::lang::target::TargetLanguage;
use whatlang::{Detector, Lang};

/// Texts shorter than this (in characters, after trimming) score 0.
pub const MIN_TEXT_CHARS: usize = 15;

/// Trigram-statistics detector (whatlang). Deterministic, no seeding involved.
pub struct StatisticalScorer {
    target: Lang,
    detector: Detector,
}

impl StatisticalScorer {
    /// `None` when the detector has no model for `lang`; the backend is then unavailable.
    pub fn new(lang: &TargetLanguage) -> Option<Self> {
        match Lang::from_code(lang.code) {
            Some(target) => Some(Self {
                target,
                detector: Detector::new(),
            }),
            None => {
                tracing::warn!(target: "lang", code = lang.code, "statistical detector does not support language");
                None
            }
        }
    }

    /// Confidence that `text` is in the target language, in `[0, 1]`.
    pub fn score(&self, text: &str) -> f64 {
        let t = text.trim();
        if t.chars().count() < MIN_TEXT_CHARS {
            return 0.0;
        }
        match self.detector.detect(t) {
            Some(info) if info.lang() == self.target => info.confidence().clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

impl std::fmt::Debug for StatisticalScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticalScorer")
            .field("target", &self.target.code())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::target::HUNGARIAN;

    #[test]
    fn short_text_is_a_definite_non_match() {
        let s = StatisticalScorer::new(&HUNGARIAN).unwrap();
        assert_eq!(s.score("  szia  "), 0.0);
    }

    #[test]
    fn english_text_scores_zero_for_hungarian() {
        let s = StatisticalScorer::new(&HUNGARIAN).unwrap();
        let text = "The quick brown fox jumps over the lazy dog while the farmer watches from the porch.";
        assert_eq!(s.score(text), 0.0);
    }

    #[test]
    fn hungarian_paragraph_scores_above_zero() {
        let s = StatisticalScorer::new(&HUNGARIAN).unwrap();
        let text = "Tegnap este a barátaimmal elmentünk a városba vacsorázni, \
                    és utána sokáig sétáltunk a Duna partján, mert nagyon szép idő volt.";
        let a = s.score(text);
        assert!(a > 0.0, "score={a}");
        assert_eq!(a, s.score(text), "detector must be deterministic");
    }
}
