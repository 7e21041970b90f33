//! Rule-based sentence segmentation and span tagging
//!
//! The pipeline only needs this capability abstractly: given text, produce
//! sentence boundaries and, per sentence, noun-phrase and named-entity
//! spans with a canonical head form. The [`Annotator`] trait is that seam;
//! [`RuleAnnotator`] is the shipped implementation - keyword dictionaries,
//! stop-word filtering, and capitalized-run detection. Deterministic for
//! identical input and configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::AnnotatorConfig;

/// Distinguishes how a span was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    /// Plain noun-phrase candidate (lowercase content word)
    NounPhrase,
    /// Named entity (keyword match or proper-noun capitalization)
    NamedEntity,
}

/// A recognized span within one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// The span text as it appeared (e.g., "New York", "philosopher")
    pub surface: String,
    /// Canonical head form: the span's final token, lower-cased
    pub head: String,
    /// How the span was recognized
    pub kind: SpanKind,
    /// Index into [`Annotation::sentences`]
    pub sentence: usize,
}

/// Output of one annotation pass over a text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Sentences in source order
    pub sentences: Vec<String>,
    /// Spans in source order
    pub spans: Vec<Span>,
}

/// Sentence segmentation + span tagging capability consumed by the
/// extraction stage. Implementations must be deterministic for identical
/// input and configuration.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<Annotation>;
}

/// Rule-based annotator with keyword dictionaries and stop-word filtering
pub struct RuleAnnotator {
    config: AnnotatorConfig,

    /// Known organization names (direct matches, lowercase)
    org_keywords: HashSet<String>,

    /// Known location names (cities, countries, lowercase)
    location_keywords: HashSet<String>,

    /// Common technology keywords (lowercase)
    tech_keywords: HashSet<String>,

    /// Function words and common verbs that are never concept spans,
    /// including capitalized occurrences at sentence start
    stop_words: HashSet<String>,
}

impl RuleAnnotator {
    pub fn new(config: AnnotatorConfig) -> Self {
        let org_keywords: HashSet<String> = vec![
            "microsoft",
            "google",
            "apple",
            "amazon",
            "meta",
            "netflix",
            "ibm",
            "oracle",
            "intel",
            "nvidia",
            "openai",
            "mozilla",
            "wikipedia",
            "unesco",
            "nato",
            "nasa",
            "mit",
            "stanford",
            "harvard",
            "oxford",
            "cambridge",
            "berkeley",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let location_keywords: HashSet<String> = vec![
            "london",
            "paris",
            "berlin",
            "rome",
            "athens",
            "vienna",
            "amsterdam",
            "madrid",
            "moscow",
            "tokyo",
            "beijing",
            "delhi",
            "mumbai",
            "singapore",
            "sydney",
            "cairo",
            "jerusalem",
            "istanbul",
            "chicago",
            "boston",
            "seattle",
            "america",
            "europe",
            "asia",
            "africa",
            "india",
            "china",
            "japan",
            "greece",
            "germany",
            "france",
            "england",
            "italy",
            "spain",
            "egypt",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let tech_keywords: HashSet<String> = vec![
            "rust",
            "python",
            "java",
            "javascript",
            "sql",
            "linux",
            "docker",
            "kubernetes",
            "api",
            "http",
            "tcp",
            "html",
            "json",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        // Function words plus common verbs: these are not concepts even
        // when capitalized at sentence start
        let mut stop_words: HashSet<String> = vec![
            // Articles, determiners, pronouns
            "the", "a", "an", "this", "that", "these", "those", "some", "any", "each", "every",
            "all", "both", "either", "neither", "other", "another", "such", "i", "we", "you",
            "he", "she", "it", "they", "me", "him", "her", "them", "us", "my", "our", "your",
            "his", "its", "their", "mine", "ours", "yours", "theirs", "who", "whom", "whose",
            "which", "what", "something", "anything", "nothing", "everything", "someone",
            "anyone", "everyone", "nobody", // Prepositions and conjunctions
            "of", "in", "on", "at", "to", "for", "with", "by", "from", "as", "into", "onto",
            "about", "over", "under", "between", "among", "through", "during", "before",
            "after", "above", "below", "against", "and", "or", "but", "nor", "so", "yet",
            "because", "although", "though", "while", "unless", "until", "since", "than",
            "whether", "if", "when", "where", "why", "how",
            // Auxiliaries and common verbs
            "is", "are", "was", "were", "be", "been", "being", "am", "have", "has", "had",
            "having", "do", "does", "did", "doing", "done", "will", "would", "can", "could",
            "shall", "should", "may", "might", "must", "get", "gets", "got", "make", "makes",
            "made", "go", "goes", "went", "gone", "say", "says", "said", "seem", "seems",
            "seemed", "become", "becomes", "became", // Adverbs and fillers
            "not", "no", "yes", "too", "also", "very", "just", "only", "even", "still",
            "then", "there", "here", "now", "again", "more", "most", "less", "least", "much",
            "many", "few", "quite", "rather", "however", "therefore", "thus", "hence",
            "indeed", "perhaps", "maybe", "often", "always", "never", "sometimes",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        for word in &config.extra_stop_words {
            stop_words.insert(word.clone());
        }

        Self {
            config,
            org_keywords,
            location_keywords,
            tech_keywords,
            stop_words,
        }
    }

    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    fn is_keyword(&self, lower: &str) -> bool {
        self.org_keywords.contains(lower)
            || self.location_keywords.contains(lower)
            || self.tech_keywords.contains(lower)
    }

    /// Tag spans within one sentence
    fn tag_sentence(&self, sentence: &str, sentence_index: usize, spans: &mut Vec<Span>) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        let mut skip_until_index = 0;

        for (i, word) in words.iter().enumerate() {
            // Skip if this word is part of a multi-word span we already tagged
            if i < skip_until_index {
                continue;
            }

            let clean_word = word.trim_matches(|c: char| !c.is_alphanumeric());

            if clean_word.is_empty() || clean_word.chars().count() < self.config.min_token_len {
                continue;
            }

            let lower = clean_word.to_lowercase();

            if self.stop_words.contains(&lower) {
                continue;
            }

            // Known keyword: tag as a named entity regardless of casing
            if self.is_keyword(&lower) {
                spans.push(Span {
                    surface: clean_word.to_string(),
                    head: lower,
                    kind: SpanKind::NamedEntity,
                    sentence: sentence_index,
                });
                continue;
            }

            let is_capitalized = clean_word
                .chars()
                .next()
                .map(|c| c.is_uppercase())
                .unwrap_or(false);

            if is_capitalized {
                // Collect a run of following capitalized words into one span
                // (e.g., "John Stuart Mill"), skipping embedded stop words
                let mut surface = clean_word.to_string();
                let mut head = lower;
                let mut j = i + 1;
                while j < words.len() {
                    let next = words[j].trim_matches(|c: char| !c.is_alphanumeric());
                    let next_capitalized = next
                        .chars()
                        .next()
                        .map(|c| c.is_uppercase())
                        .unwrap_or(false);
                    if !next_capitalized {
                        break;
                    }
                    if !self.is_stop_word(next) {
                        surface.push(' ');
                        surface.push_str(next);
                        head = next.to_lowercase();
                    }
                    j += 1;
                }
                if j > i + 1 {
                    skip_until_index = j;
                }

                // Multi-word runs and mid-sentence capitalization are
                // proper-noun evidence; a lone capitalized word at sentence
                // start is just sentence case
                let kind = if j > i + 1 || i > 0 {
                    SpanKind::NamedEntity
                } else {
                    SpanKind::NounPhrase
                };

                spans.push(Span {
                    surface,
                    head,
                    kind,
                    sentence: sentence_index,
                });
                continue;
            }

            // Lowercase content word: noun-phrase candidate
            spans.push(Span {
                surface: clean_word.to_string(),
                head: lower,
                kind: SpanKind::NounPhrase,
                sentence: sentence_index,
            });
        }
    }
}

impl Annotator for RuleAnnotator {
    fn annotate(&self, text: &str) -> Result<Annotation> {
        if self.config.max_text_len > 0 && text.len() > self.config.max_text_len {
            anyhow::bail!(
                "input of {} bytes exceeds configured limit of {} bytes",
                text.len(),
                self.config.max_text_len
            );
        }

        if text.trim().is_empty() {
            return Ok(Annotation::default());
        }

        let sentences = split_sentences(text);
        let mut spans = Vec::new();

        for (idx, sentence) in sentences.iter().enumerate() {
            self.tag_sentence(sentence, idx, &mut spans);
        }

        tracing::debug!(
            sentences = sentences.len(),
            spans = spans.len(),
            "annotated text"
        );

        Ok(Annotation { sentences, spans })
    }
}

impl Default for RuleAnnotator {
    fn default() -> Self {
        Self::new(AnnotatorConfig::default())
    }
}

/// Split text into sentences on `.`, `!`, `?`.
///
/// Decimal points within numbers (e.g. 3.14) are preserved and NOT treated
/// as sentence boundaries.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut sentences = Vec::new();
    let mut current = String::new();

    for i in 0..len {
        let ch = chars[i];
        current.push(ch);

        let is_boundary = match ch {
            '!' | '?' => true,
            '.' => {
                // Digit on both sides means a decimal point, not a boundary
                let prev_is_digit = i > 0 && chars[i - 1].is_ascii_digit();
                let next_is_digit = i + 1 < len && chars[i + 1].is_ascii_digit();
                !(prev_is_digit && next_is_digit)
            }
            _ => false,
        };

        if is_boundary {
            let trimmed = current.trim();
            if trimmed.chars().count() > 1 {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    // Trailing text without terminal punctuation is still a sentence
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}
