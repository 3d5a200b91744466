//! Bounded text relevance between a query and a candidate.
//!
//! Two signals are combined: a match against the candidate's name or headline
//! and a match against its attribute labels. Scores live in
//! `[relevance_epsilon, 1.0]` for non-empty queries; an empty query gives every
//! candidate the same neutral score so tier and distance decide the order.

use itertools::Itertools;

use crate::{config::RankingConfig, listing::Candidate};

/// Name signal for an exact (case-insensitive) name match.
const EXACT_NAME_MATCH: f64 = 1.0;
/// Name signal when the whole query appears inside the name or headline.
const PHRASE_MATCH: f64 = 0.8;
/// Upper bound of the name signal from individual query terms.
const TERM_MATCH_CEILING: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct RelevanceScorer<'a> {
    config: &'a RankingConfig,
    phrase: Option<String>,
    terms: Vec<String>,
}

impl<'a> RelevanceScorer<'a> {
    /// Prepares a scorer for one query. `None` or blank queries score neutral.
    #[must_use]
    pub fn new(config: &'a RankingConfig, query: Option<&str>) -> Self {
        let phrase = query
            .map(|q| q.split_whitespace().join(" ").to_lowercase())
            .filter(|q| !q.is_empty());
        let terms = phrase
            .as_deref()
            .map(|p| p.split_whitespace().map(ToString::to_string).unique().collect())
            .unwrap_or_default();

        Self {
            config,
            phrase,
            terms,
        }
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.phrase.is_none()
    }

    /// Scores a candidate in `[0, 1]`.
    #[must_use]
    pub fn score(&self, candidate: &Candidate) -> f64 {
        let Some(phrase) = self.phrase.as_deref() else {
            return self.config.neutral_relevance;
        };

        let name = normalize(&candidate.name);
        let headline = candidate.headline.as_deref().map(normalize).unwrap_or_default();
        let labels = candidate
            .attributes
            .iter()
            .map(|attr| normalize(attr.display_text()))
            .filter(|label| !label.is_empty())
            .collect::<Vec<_>>();

        let name_signal = if !name.is_empty() && name == phrase {
            EXACT_NAME_MATCH
        } else if name.contains(phrase) || headline.contains(phrase) {
            PHRASE_MATCH
        } else {
            TERM_MATCH_CEILING
                * self.term_fraction(|term| name.contains(term) || headline.contains(term))
        };

        let label_signal = if labels.iter().any(|label| label.contains(phrase)) {
            1.0
        } else {
            self.term_fraction(|term| labels.iter().any(|label| label.contains(term)))
        };

        let weights = self.config.weights;
        let score = weights.name_weight * name_signal + weights.label_weight * label_signal;
        score.clamp(self.config.relevance_epsilon, 1.0)
    }

    fn term_fraction(&self, matches: impl Fn(&str) -> bool) -> f64 {
        if self.terms.is_empty() {
            return 0.0;
        }
        let matched = self.terms.iter().filter(|term| matches(term)).count();
        matched as f64 / self.terms.len() as f64
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RankingConfigBuilder, listing::Attribute};

    fn score(query: Option<&str>, candidate: &Candidate) -> f64 {
        let config = RankingConfig::default();
        RelevanceScorer::new(&config, query).score(candidate)
    }

    #[test]
    fn test_empty_query_is_neutral() {
        let candidate = Candidate::new("a", "Bright Steps");
        assert!((score(None, &candidate) - 0.5).abs() < f64::EPSILON);
        assert!((score(Some("   "), &candidate) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_match_floors_at_epsilon() {
        let candidate = Candidate::new("a", "Bright Steps");
        assert!((score(Some("plumbing"), &candidate) - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blank_candidate_fields() {
        let candidate = Candidate::new("a", "   ")
            .with_headline("")
            .with_attribute(Attribute::new("category", " "));
        let s = score(Some("therapy"), &candidate);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn test_case_insensitive() {
        let candidate = Candidate::new("a", "Bright Steps ABA");
        assert_eq!(
            score(Some("bright steps aba"), &candidate),
            score(Some("BRIGHT  STEPS ABA"), &candidate)
        );
    }

    #[test]
    fn test_exact_name_beats_label_only() {
        let exact = Candidate::new("a", "Speech Therapy");
        let label_only = Candidate::new("b", "Little Voices")
            .with_attribute(Attribute::new("category", "speech").with_label("Speech Therapy"));

        assert!(score(Some("speech therapy"), &exact) >= score(Some("speech therapy"), &label_only));

        let config = RankingConfigBuilder::new()
            .relevance_weights(0.5, 0.5)
            .unwrap()
            .build();
        let scorer = RelevanceScorer::new(&config, Some("speech therapy"));
        assert!(scorer.score(&exact) >= scorer.score(&label_only));
    }

    #[test]
    fn test_ordering_of_signals() {
        let query = Some("autism center");
        let exact = Candidate::new("a", "Autism Center");
        let phrase = Candidate::new("b", "The Autism Center of Edison");
        let partial = Candidate::new("c", "Edison Autism Services");
        let headline = Candidate::new("d", "Hope House").with_headline("A full autism center");

        assert!(score(query, &exact) > score(query, &phrase));
        assert!(score(query, &phrase) > score(query, &partial));
        assert!((score(query, &phrase) - score(query, &headline)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_labels_contribute() {
        let query = Some("aba");
        let plain = Candidate::new("a", "Hope House");
        let labelled = Candidate::new("b", "Hope House")
            .with_attribute(Attribute::new("category", "aba").with_label("ABA Therapy"));

        assert!(score(query, &labelled) > score(query, &plain));
    }
}
